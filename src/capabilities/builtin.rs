//! Built-in capability providers that work without network access.

use async_trait::async_trait;

use super::{CapabilityError, CapabilityParams, CapabilityProvider};

const UNABLE_MESSAGE: &str =
    "Unable to provide specific clothing recommendations based on the given weather information.";

/// Recommends clothing from a free-text weather description.
///
/// Takes a `weather_description` (or `conditions`) parameter such as
/// `"Sunny, 25°C"` and derives packing advice from the temperature and the
/// condition keywords it finds.
#[derive(Debug, Default)]
pub struct ClothingRecommendation;

impl ClothingRecommendation {
    pub fn new() -> Self {
        Self
    }

    fn recommend(description: &str) -> String {
        let temp_celsius = description
            .split_whitespace()
            .find(|part| part.contains("°C"))
            .and_then(|part| part.replace("°C", "").parse::<f64>().ok());
        let conditions = description.to_lowercase();

        let mut recommendations: Vec<&str> = Vec::new();

        if let Some(temp) = temp_celsius {
            if temp > 25.0 {
                recommendations
                    .push("Lightweight and breathable clothing (t-shirts, shorts, light dresses)");
                recommendations.push("Sun hat and sunglasses");
            } else if temp > 15.0 {
                recommendations
                    .push("Light layers (t-shirts, light sweaters, jeans or light pants)");
            } else if temp > 5.0 {
                recommendations.push("Warm layers (sweaters, jackets, long pants)");
            } else {
                recommendations.push("Heavy winter clothing (thick coat, scarf, gloves, thermals)");
            }
        }

        if conditions.contains("rain") || conditions.contains("shower") {
            recommendations.push("Waterproof jacket or umbrella");
            recommendations.push("Waterproof footwear");
        }
        if conditions.contains("snow") {
            recommendations.push("Snow boots with good traction");
            recommendations.push("Waterproof outer layers");
        }
        if conditions.contains("wind") {
            recommendations.push("Windproof jacket or coat");
        }
        if conditions.contains("sun") || conditions.contains("clear") {
            recommendations.push("Sunscreen and sunglasses");
            if temp_celsius.map_or(false, |temp| temp > 20.0) {
                recommendations.push("Hat for sun protection");
            }
        }

        if recommendations.is_empty() {
            UNABLE_MESSAGE.to_string()
        } else {
            format!("Recommended clothing:\n- {}", recommendations.join("\n- "))
        }
    }
}

#[async_trait]
impl CapabilityProvider for ClothingRecommendation {
    fn name(&self) -> &str {
        "clothing_recommendation"
    }

    fn description(&self) -> &str {
        "Recommends appropriate clothing for a weather description such as 'Sunny, 25°C' or 'Rainy, 10°C'."
    }

    async fn call(&self, params: &CapabilityParams) -> Result<String, CapabilityError> {
        let description = params
            .get("weather_description")
            .or_else(|| params.get("conditions"))
            .and_then(|value| value.as_str())
            .unwrap_or_default();
        Ok(Self::recommend(description))
    }
}

/// Provider returning a fixed text, for offline runs and tests.
#[derive(Debug)]
pub struct StaticText {
    name: String,
    text: String,
    description: String,
    available: bool,
}

impl StaticText {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        let description = format!("Static '{name}' data");
        Self {
            name,
            text: text.into(),
            description,
            available: true,
        }
    }

    /// Mark the provider unavailable, for exercising exclusion paths.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

#[async_trait]
impl CapabilityProvider for StaticText {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn available(&self) -> bool {
        self.available
    }

    async fn call(&self, _params: &CapabilityParams) -> Result<String, CapabilityError> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_and_sunny() {
        let advice = ClothingRecommendation::recommend("Sunny, 28°C");
        assert!(advice.starts_with("Recommended clothing:\n- "));
        assert!(advice.contains("Lightweight and breathable clothing"));
        assert!(advice.contains("Sunscreen and sunglasses"));
        assert!(advice.contains("Hat for sun protection"));
    }

    #[test]
    fn test_cold_and_snowy() {
        let advice = ClothingRecommendation::recommend("Snow, -3°C");
        assert!(advice.contains("Heavy winter clothing"));
        assert!(advice.contains("Snow boots with good traction"));
        assert!(!advice.contains("Sunscreen"));
    }

    #[test]
    fn test_rain_without_temperature() {
        let advice = ClothingRecommendation::recommend("Light showers expected");
        assert!(advice.contains("Waterproof jacket or umbrella"));
        assert!(advice.contains("Waterproof footwear"));
    }

    #[test]
    fn test_mild_sun_no_hat() {
        let advice = ClothingRecommendation::recommend("Clear, 18°C");
        assert!(advice.contains("Light layers"));
        assert!(advice.contains("Sunscreen and sunglasses"));
        assert!(!advice.contains("Hat for sun protection"));
    }

    #[test]
    fn test_unrecognized_input() {
        assert_eq!(ClothingRecommendation::recommend("fog of war"), UNABLE_MESSAGE);
        assert_eq!(ClothingRecommendation::recommend(""), UNABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_call_reads_description_param() {
        let provider = ClothingRecommendation::new();
        let mut params = CapabilityParams::new();
        params.insert(
            "weather_description".to_string(),
            serde_json::Value::String("Windy, 10°C".to_string()),
        );

        let advice = provider.call(&params).await.unwrap();
        assert!(advice.contains("Windproof jacket or coat"));
        assert!(advice.contains("Warm layers"));
    }

    #[tokio::test]
    async fn test_call_without_params_is_graceful() {
        let provider = ClothingRecommendation::new();
        let advice = provider.call(&CapabilityParams::new()).await.unwrap();
        assert_eq!(advice, UNABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_static_text() {
        let provider = StaticText::new("web_search", "canned result");
        assert_eq!(provider.name(), "web_search");
        assert!(provider.available());
        let out = provider.call(&CapabilityParams::new()).await.unwrap();
        assert_eq!(out, "canned result");
    }
}
