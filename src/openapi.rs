use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorResponse;
use crate::forecast::models::{DailyForecastEntry, OverviewResponse};
use crate::models::{GeoLocation, WeatherCondition, WeatherSnapshot};
use crate::weather::handlers::HealthResponse;
use crate::weather::CurrentWeatherResponse;

/// OpenAPI documentation for the Skycast API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Skycast API",
        version = "1.0.0",
        description = "Location-based current weather and daily forecast API using OpenWeatherMap. The daily forecast picks the 13:00 sample of each day as its representative.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::weather::handlers::health,
        crate::weather::handlers::get_weather,
        crate::forecast::handlers::get_forecast,
        crate::forecast::handlers::get_overview,
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "weather", description = "Current weather data"),
        (name = "forecast", description = "Daily forecasts")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            GeoLocation,
            WeatherCondition,
            WeatherSnapshot,
            CurrentWeatherResponse,
            DailyForecastEntry,
            OverviewResponse,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
