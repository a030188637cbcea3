use std::{sync::Arc, time::Duration};

use battlenet::PriceSnapshot;
use chrono::Utc;
use futures::future::{self, Either};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, instrument};

use crate::broadcast::{notification::Notification, notify_destination, ChatGateway, DestinationId};

pub(crate) enum PriceAlertTx {
    Stop,
}

/// Repeating "price in range" alert for a single destination.
///
/// The task stops on [`PriceAlertTx::Stop`] or once the listener is dropped.
pub(crate) struct PriceAlertListener {
    pub(crate) destination: DestinationId,
    cancellation_sender: mpsc::Sender<PriceAlertTx>,
    handle: JoinHandle<()>,
}

impl PriceAlertListener {
    /// Every `period`, starting one `period` from now, re-sends the alert for `snapshot`.
    /// The snapshot is the one that opened the alert; it is not refreshed between fires.
    #[instrument(skip(gateway, channel_name))]
    pub(crate) fn create_listener<G: ChatGateway>(
        destination: DestinationId,
        snapshot: PriceSnapshot,
        gateway: Arc<G>,
        channel_name: Arc<str>,
        period: Duration,
    ) -> Self {
        let (cancellation_sender, mut receiver) = mpsc::channel::<PriceAlertTx>(1);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let ended =
                    future::select(Box::pin(receiver.recv()), Box::pin(interval.tick())).await;
                match ended {
                    // stop requested, or the listener was dropped
                    Either::Left(_) => break,
                    Either::Right(_) => {
                        let alert = Notification::range_alert(&snapshot, Utc::now());
                        notify_destination(gateway.as_ref(), destination, &channel_name, &alert)
                            .await;
                    }
                }
            }
            debug!("price alert for {destination:?} stopped");
        });
        Self {
            destination,
            cancellation_sender,
            handle,
        }
    }

    pub(crate) fn stop(self) {
        let _ = self.cancellation_sender.try_send(PriceAlertTx::Stop);
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
