use std::env;
use std::fs;
use std::path::Path;

const PLACEHOLDER_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>%SYSTEM_NAME%</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 560px; margin: 96px auto; padding: 0 20px; }
        code { background: #f1f3f4; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>%SYSTEM_NAME%</h1>
    <p>The API server is running, but no frontend bundle was embedded in this build.</p>
    <p>Build the frontend into <code>frontend/dist</code> and rebuild the server.</p>
</body>
</html>
"#;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    if !dist_path.join("index.html").exists() {
        println!("cargo:warning=frontend/dist not found, embedding placeholder page");
        fs::create_dir_all(&dist_path).expect("Failed to create frontend/dist");
        fs::write(dist_path.join("index.html"), PLACEHOLDER_INDEX)
            .expect("Failed to write placeholder index.html");
    }
}
