#[cfg(test)]
mod tests {
    use crate::api::OpenMeteoClient;
    use crate::config::Config;
    use crate::error::AppError;
    use crate::naqi::Pollutant;
    use mockito::{Matcher, Server};
    use serde_json::json;

    // Helper to point a client at the mock server for both APIs
    fn client_for(server: &Server) -> OpenMeteoClient {
        let config = Config {
            air_quality_base_url: server.url(),
            geocoding_base_url: server.url(),
            ..Config::default()
        };
        OpenMeteoClient::new(&config).unwrap()
    }

    fn air_quality_body() -> serde_json::Value {
        json!({
            "latitude": 19.0,
            "longitude": 72.875,
            "generationtime_ms": 0.2,
            "utc_offset_seconds": 19800,
            "timezone": "Asia/Kolkata",
            "timezone_abbreviation": "IST",
            "elevation": 12.0,
            "hourly_units": { "time": "iso8601", "pm10": "μg/m³" },
            "hourly": {
                "time": ["2025-01-14T00:00", "2025-01-14T01:00", "2025-01-14T02:00"],
                "pm10": [88.1, 90.4, null],
                "pm2_5": [51.0, 52.2, 49.9],
                "ammonia": [null, null, null],
                "us_aqi": [140, 141, 139]
            }
        })
    }

    #[tokio::test]
    async fn test_get_air_quality_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/air-quality")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("latitude".into(), "19".into()),
                Matcher::UrlEncoded("longitude".into(), "72.875".into()),
                Matcher::UrlEncoded("timezone".into(), "auto".into()),
                Matcher::UrlEncoded("past_days".into(), "1".into()),
                Matcher::UrlEncoded("forecast_days".into(), "1".into()),
                Matcher::Regex("hourly=pm10%2Cpm2_5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(air_quality_body().to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let response = client.get_air_quality(19.0, 72.875).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.utc_offset_seconds, 19_800);
        assert_eq!(response.hourly.time.len(), 3);
        assert_eq!(
            response.hourly.column(Pollutant::Pm10),
            Some(&[Some(88.1), Some(90.4), None][..])
        );
        assert_eq!(response.hourly.column(Pollutant::Co), None);
    }

    #[tokio::test]
    async fn test_get_air_quality_server_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/air-quality")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":true,"reason":"Latitude must be in range of -90 to 90°."}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.get_air_quality(123.0, 0.0).await;

        mock.assert_async().await;
        match result {
            Err(AppError::Api(e)) => assert_eq!(e.status(), Some(reqwest::StatusCode::BAD_REQUEST)),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_air_quality_rejects_ragged_series() {
        let mut body = air_quality_body();
        body["hourly"]["pm2_5"] = json!([51.0]);

        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/air-quality")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.get_air_quality(19.0, 72.875).await;
        assert!(matches!(result, Err(AppError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_get_air_quality_malformed_json() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/air-quality")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{ not json")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.get_air_quality(19.0, 72.875).await;
        assert!(matches!(result, Err(AppError::JsonParse(_))));
    }

    #[tokio::test]
    async fn test_search_locations() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("name".into(), "Delhi".into()),
                Matcher::UrlEncoded("count".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "results": [{
                        "id": 1273294,
                        "name": "Delhi",
                        "latitude": 28.65195,
                        "longitude": 77.23149,
                        "country": "India",
                        "admin1": "Delhi",
                        "timezone": "Asia/Kolkata"
                    }],
                    "generationtime_ms": 0.5
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let results = client.search_locations("Delhi").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].display_name(), "Delhi, Delhi, India");
    }

    #[tokio::test]
    async fn test_search_locations_no_match() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"generationtime_ms":0.3}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let results = client.search_locations("Nowhereville").await.unwrap();
        assert!(results.is_empty());
    }
}
