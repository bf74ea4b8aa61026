use actix_web::HttpResponse;

use super::SystemService;
use crate::models::{ApiResponse, system::responses::SystemSettingsResponse};
use crate::services::Outcome;

pub fn get_settings(service: &SystemService) -> Outcome {
    let settings = SystemSettingsResponse::from(service.get_config());
    Ok(HttpResponse::Ok().json(ApiResponse::success(settings, "Success")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_settings_hide_secrets() {
        let settings = SystemSettingsResponse::from(AppConfig::get());
        let json = serde_json::to_string(&settings).expect("serialize");
        assert!(!json.contains(&AppConfig::get().jwt.secret));
        assert!(!json.contains(&AppConfig::get().database.url));
    }
}
