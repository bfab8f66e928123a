use crate::config::DeliveryConfig;
use crate::domain::submission::ContactSubmission;
use crate::services::relay::{DeliveryError, MailRelay};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct Metrics {
    sent: Counter<u64>,
    errors: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("neblina-server");
        Self {
            sent: meter
                .u64_counter("contact_sent_total")
                .with_description("Contact messages successfully handed to the relay")
                .build(),
            errors: meter
                .u64_counter("contact_delivery_errors_total")
                .with_description("Contact delivery failures by reason")
                .build(),
        }
    }
}

/// Hands validated submissions to the configured relay and classifies
/// failures into the stable error taxonomy.
#[derive(Clone, Debug)]
pub struct ContactService {
    relay: Arc<dyn MailRelay>,
    delivery: DeliveryConfig,
    metrics: Metrics,
}

impl ContactService {
    #[must_use]
    pub fn new(relay: Arc<dyn MailRelay>, delivery: DeliveryConfig) -> Self {
        Self { relay, delivery, metrics: Metrics::new() }
    }

    /// Verifies the relay credentials are present, returning the name of the
    /// first missing variable otherwise.
    ///
    /// # Errors
    /// Returns the environment variable name that is unset or empty.
    pub fn relay_configured(&self) -> Result<(), &'static str> {
        if self.delivery.access_key.as_deref().is_none_or(str::is_empty) {
            return Err("NEBLINA_WEB3FORMS_ACCESS_KEY");
        }
        if self.delivery.recipient.as_deref().is_none_or(str::is_empty) {
            return Err("NEBLINA_CONTACT_RECIPIENT");
        }
        Ok(())
    }

    /// Sends a validated submission through the relay.
    ///
    /// Configuration is checked before any network call so a misconfigured
    /// deployment reports a configuration error instead of a transport one.
    ///
    /// # Errors
    /// Returns a [`DeliveryError`] for missing configuration or any relay
    /// failure.
    pub async fn send_message(&self, submission: &ContactSubmission) -> Result<(), DeliveryError> {
        if let Err(variable) = self.relay_configured() {
            tracing::error!(missing = variable, "contact relay is not configured");
            self.metrics.errors.add(1, &[KeyValue::new("reason", "configuration")]);
            return Err(DeliveryError::MissingConfiguration(variable));
        }

        let access_key = self.delivery.access_key.as_deref().unwrap_or_default();

        match self.relay.deliver(access_key, submission).await {
            Ok(()) => {
                self.metrics.sent.add(1, &[]);
                Ok(())
            }
            Err(e) => {
                self.metrics.errors.add(1, &[KeyValue::new("reason", e.reason_label())]);
                Err(e)
            }
        }
    }
}
