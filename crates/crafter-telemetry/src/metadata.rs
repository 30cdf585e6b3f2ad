use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource as semconv;
use crafter_config::TelemetryConfig;

/// Build an OpenTelemetry Resource from configuration
pub fn build_resource(config: &TelemetryConfig) -> Resource {
    let mut attrs = vec![
        KeyValue::new(semconv::SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(semconv::SERVICE_VERSION, env!("CARGO_PKG_VERSION").to_string()),
    ];

    for (key, value) in &config.resource_attributes {
        attrs.push(KeyValue::new(key.clone(), value.clone()));
    }

    Resource::builder().with_attributes(attrs).build()
}

#[cfg(test)]
mod tests {
    use crafter_config::TelemetryConfig;
    use opentelemetry::{Key, Value};

    use super::build_resource;

    #[test]
    fn resource_carries_service_name_and_custom_attributes() {
        let mut config = TelemetryConfig {
            service_name: "orders".to_string(),
            ..TelemetryConfig::default()
        };
        config
            .resource_attributes
            .insert("deployment.environment".to_string(), "staging".to_string());

        let resource = build_resource(&config);

        assert_eq!(resource.get(&Key::new("service.name")), Some(Value::from("orders")));
        assert_eq!(
            resource.get(&Key::new("deployment.environment")),
            Some(Value::from("staging"))
        );
    }
}
