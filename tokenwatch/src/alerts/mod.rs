pub(crate) mod alert_manager;
pub(crate) mod price_alert;
