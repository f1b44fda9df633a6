//! Home page rendering.
//!
//! The page is a static template with a handful of placeholders, filled from a
//! [`PageView`]. It also polls `/history` from the browser to stay current.

use crate::model::WeatherData;
use serde::Serialize;

const INDEX_HTML: &str = include_str!("index.html");
const NO_DATA: &str = "No data yet";

/// Everything the home page needs: the latest values and when they arrived.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageView {
    pub weather_data: Option<WeatherData>,
    pub last_update: Option<String>,
}

impl PageView {
    pub fn render(&self) -> String {
        let (temp, hum) = match &self.weather_data {
            Some(data) => (format!("{} °C", data.temp), format!("{} %", data.hum)),
            None => ("--".to_string(), "--".to_string()),
        };
        let last_update = self.last_update.as_deref().unwrap_or(NO_DATA);

        INDEX_HTML
            .replace("{{temp}}", &temp)
            .replace("{{hum}}", &hum)
            .replace("{{last_update}}", last_update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_data() {
        let view = PageView {
            weather_data: Some(WeatherData {
                temp: 23.4,
                hum: 55.1,
            }),
            last_update: Some("14:05:02".to_string()),
        };

        let html = view.render();
        assert!(html.contains("23.4 °C"));
        assert!(html.contains("55.1 %"));
        assert!(html.contains("14:05:02"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_render_empty() {
        let html = PageView::default().render();
        assert!(html.contains(NO_DATA));
        assert!(!html.contains("{{"));
    }
}
