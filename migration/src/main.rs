use sea_orm_migration::prelude::*;

// 独立的迁移命令行：up / down / status / fresh
// 数据库地址从 DATABASE_URL 读取
#[tokio::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
