use std::{collections::HashMap, sync::Arc, time::Duration};

use battlenet::PriceSnapshot;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{
    broadcast::{notification::Notification, notify_all, ChatGateway, DestinationId},
    prices::PriceSource,
};

use super::price_alert::PriceAlertListener;

/// Inclusive band of prices that keeps an alert running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PriceRange {
    pub(crate) min: u64,
    pub(crate) max: u64,
}

impl PriceRange {
    pub(crate) fn contains(&self, price: u64) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AlertSettings {
    pub(crate) channel_name: Arc<str>,
    pub(crate) range: PriceRange,
    pub(crate) check_interval: Duration,
    pub(crate) alert_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Started,
    Stopped,
    Unchanged,
}

/// Running alerts, at most one per destination
#[derive(Default)]
pub(crate) struct AlertRegistry {
    current_price_alerts: HashMap<DestinationId, PriceAlertListener>,
}

impl AlertRegistry {
    pub(crate) fn is_alerting(&self, destination: DestinationId) -> bool {
        self.current_price_alerts.contains_key(&destination)
    }

    pub(crate) fn len(&self) -> usize {
        self.current_price_alerts.len()
    }

    fn insert(&mut self, listener: PriceAlertListener) {
        if let Some(previous) = self
            .current_price_alerts
            .insert(listener.destination, listener)
        {
            previous.stop();
        }
    }

    fn remove(&mut self, destination: DestinationId) -> bool {
        match self.current_price_alerts.remove(&destination) {
            Some(listener) => {
                listener.stop();
                true
            }
            None => false,
        }
    }
}

/// Drives the periodic price check: broadcast the price everywhere, then open or close each
/// destination's range alert.
pub(crate) struct AlertManager<P, G> {
    prices: Arc<P>,
    gateway: Arc<G>,
    settings: AlertSettings,
    registry: AlertRegistry,
}

impl<P: PriceSource, G: ChatGateway> AlertManager<P, G> {
    pub(crate) fn new(prices: Arc<P>, gateway: Arc<G>, settings: AlertSettings) -> Self {
        Self {
            prices,
            gateway,
            settings,
            registry: AlertRegistry::default(),
        }
    }

    pub(crate) fn registry(&self) -> &AlertRegistry {
        &self.registry
    }

    /// Runs for the life of the process. The first check happens one interval after start.
    pub(crate) async fn start_manager(mut self) {
        let period = self.settings.check_interval;
        info!(
            "Checking the WoW token price every {period:?}, alerting between {} and {}",
            self.settings.range.min, self.settings.range.max
        );
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.check_price().await;
        }
    }

    /// One tick. Without a price nothing is sent and every alert keeps its state.
    pub(crate) async fn check_price(&mut self) -> Option<PriceSnapshot> {
        let Some(snapshot) = self.prices.wow_token_price().await else {
            warn!("No WoW token price this tick");
            return None;
        };
        debug!("WoW token price {} ({})", snapshot.price, snapshot.observed_at);
        let delivered = notify_all(
            self.gateway.as_ref(),
            &self.settings.channel_name,
            &Notification::price_update(&snapshot),
        )
        .await;
        debug!("price update delivered to {delivered} destinations");
        for destination in self.gateway.destinations().await {
            self.evaluate(destination, &snapshot);
        }
        Some(snapshot)
    }

    pub(crate) fn evaluate(
        &mut self,
        destination: DestinationId,
        snapshot: &PriceSnapshot,
    ) -> Transition {
        let in_range = self.settings.range.contains(snapshot.price);
        match (in_range, self.registry.is_alerting(destination)) {
            (true, false) => {
                info!(
                    "Price {} in range, starting alerts for {destination:?}",
                    snapshot.price
                );
                self.registry.insert(PriceAlertListener::create_listener(
                    destination,
                    snapshot.clone(),
                    self.gateway.clone(),
                    self.settings.channel_name.clone(),
                    self.settings.alert_interval,
                ));
                Transition::Started
            }
            (false, true) => {
                info!(
                    "Price {} out of range, stopping alerts for {destination:?}",
                    snapshot.price
                );
                self.registry.remove(destination);
                Transition::Stopped
            }
            _ => Transition::Unchanged,
        }
    }
}
