use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use vista_config::CorsConfig;

/// Build a Tower CORS layer from configuration
///
/// Credentialed requests cannot use wildcards, so in that case the request's
/// origin, method, and headers are mirrored instead.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    // Origins
    layer = match (config.allows_any_origin(), config.credentials) {
        (true, false) => layer.allow_origin(AllowOrigin::any()),
        (true, true) => layer.allow_origin(AllowOrigin::mirror_request()),
        (false, _) => {
            let origins: Vec<_> = config.origins.iter().filter_map(|o| o.parse().ok()).collect();
            layer.allow_origin(origins)
        }
    };

    // Methods and headers
    layer = if config.credentials {
        layer
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        layer.allow_methods(AllowMethods::any()).allow_headers(AllowHeaders::any())
    };

    // Max age
    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}
