// Query parameter set handed to the fetch collaborator
use super::variables::VariableRequest;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    pub latitude: f64,
    pub longitude: f64,
    pub current: VariableRequest,
    pub hourly: VariableRequest,
    pub timezone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl QueryParams {
    /// Query string pairs in wire order. Empty variable lists are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
        ];

        if !self.current.is_empty() {
            pairs.push(("current", self.current.to_query_value()));
        }
        if !self.hourly.is_empty() {
            pairs.push(("hourly", self.hourly.to_query_value()));
        }

        pairs.push(("timezone", self.timezone.clone()));
        pairs.push(("start_date", self.start_date.format("%Y-%m-%d").to_string()));
        pairs.push(("end_date", self.end_date.format("%Y-%m-%d").to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> QueryParams {
        QueryParams {
            latitude: 50.0461,
            longitude: 1.4208,
            current: VariableRequest::new(["european_aqi", "pm10"]),
            hourly: VariableRequest::new(["pm10", "pm2_5"]),
            timezone: "Europe/Berlin".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
        }
    }

    #[test]
    fn test_query_pairs_order() {
        let pairs = sample_params().query_pairs();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();

        assert_eq!(
            keys,
            vec![
                "latitude",
                "longitude",
                "current",
                "hourly",
                "timezone",
                "start_date",
                "end_date"
            ]
        );
        assert_eq!(pairs[0].1, "50.0461");
        assert_eq!(pairs[2].1, "european_aqi,pm10");
        assert_eq!(pairs[3].1, "pm10,pm2_5");
        assert_eq!(pairs[5].1, "2024-01-01");
        assert_eq!(pairs[6].1, "2024-05-15");
    }

    #[test]
    fn test_empty_variable_lists_are_omitted() {
        let mut params = sample_params();
        params.current = VariableRequest::default();

        let pairs = params.query_pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "current"));
        assert!(pairs.iter().any(|(k, _)| *k == "hourly"));
    }
}
