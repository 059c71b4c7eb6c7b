//! Per-station state tracked by the server

use crate::engine::ConnectionId;
use csms_shared::{
    now_ms, ChargingState, ChargingStation, ConnectorStatus, FirmwareStatus, MeterValue,
};
use std::collections::HashMap;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

/// A time-bounded hold on a connector for one id token
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i32,
    pub connector_id: i32,
    pub id_token: String,
    pub expiry_ms: u64,
}

impl Reservation {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expiry_ms
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorState {
    pub connector_id: i32,
    pub status: ConnectorStatus,
    pub reservation: Option<Reservation>,
}

impl ConnectorState {
    fn new(connector_id: i32) -> Self {
        Self {
            connector_id,
            status: ConnectorStatus::Available,
            reservation: None,
        }
    }

    fn take_reservation(&mut self) -> Option<Reservation> {
        let reservation = self.reservation.take()?;
        if self.status == ConnectorStatus::Reserved {
            self.status = ConnectorStatus::Available;
        }
        Some(reservation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionState {
    pub transaction_id: String,
    pub connector_id: i32,
    pub status: ChargingState,
    pub started_at_ms: u64,
    pub meter_values: Vec<MeterValue>,
}

impl TransactionState {
    pub fn new(transaction_id: impl Into<String>, connector_id: i32, started_at_ms: u64) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            connector_id,
            status: ChargingState::Idle,
            started_at_ms,
            meter_values: Vec::new(),
        }
    }

    /// Total number of sampled values across all meter readings
    pub fn sample_count(&self) -> usize {
        self.meter_values.iter().map(|m| m.sampled_value.len()).sum()
    }
}

/// Connectors, transactions and bookkeeping for one station.
///
/// Connector ids and transaction ids are map keys, so they are unique within
/// the station by construction.
#[derive(Debug, Default)]
pub struct StationState {
    connectors: HashMap<i32, ConnectorState>,
    transactions: HashMap<String, TransactionState>,
    pub local_list_version: Option<i32>,
    pub boot_info: Option<ChargingStation>,
    pub firmware_status: Option<FirmwareStatus>,
    pub last_heartbeat_ms: Option<u64>,
}

impl StationState {
    pub fn connector(&self, connector_id: i32) -> Option<&ConnectorState> {
        self.connectors.get(&connector_id)
    }

    /// Get a connector, creating it on first reference
    pub fn connector_mut(&mut self, connector_id: i32) -> &mut ConnectorState {
        self.connectors
            .entry(connector_id)
            .or_insert_with(|| ConnectorState::new(connector_id))
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    pub fn set_connector_status(&mut self, connector_id: i32, status: ConnectorStatus) {
        self.connector_mut(connector_id).status = status;
    }

    /// Attach a reservation to its target connector, replacing any previous one
    pub fn reserve(&mut self, reservation: Reservation) -> Option<Reservation> {
        let connector = self.connector_mut(reservation.connector_id);
        if connector.status == ConnectorStatus::Available {
            connector.status = ConnectorStatus::Reserved;
        }
        connector.reservation.replace(reservation)
    }

    pub fn reservation(&self, reservation_id: i32) -> Option<&Reservation> {
        self.connectors
            .values()
            .filter_map(|c| c.reservation.as_ref())
            .find(|r| r.id == reservation_id)
    }

    /// Remove a reservation wherever it is held
    pub fn cancel_reservation(&mut self, reservation_id: i32) -> Option<Reservation> {
        self.connectors
            .values_mut()
            .find(|c| c.reservation.as_ref().is_some_and(|r| r.id == reservation_id))
            .and_then(ConnectorState::take_reservation)
    }

    /// Drop every reservation whose expiry has passed
    pub fn purge_expired_reservations(&mut self, now_ms: u64) -> Vec<Reservation> {
        self.connectors
            .values_mut()
            .filter(|c| c.reservation.as_ref().is_some_and(|r| r.is_expired(now_ms)))
            .filter_map(ConnectorState::take_reservation)
            .collect()
    }

    pub fn transaction(&self, transaction_id: &str) -> Option<&TransactionState> {
        self.transactions.get(transaction_id)
    }

    pub fn transaction_mut(&mut self, transaction_id: &str) -> Option<&mut TransactionState> {
        self.transactions.get_mut(transaction_id)
    }

    /// Insert a transaction unless one with the same id exists.
    ///
    /// Returns false when the id is already taken; the existing transaction
    /// is left untouched.
    pub fn start_transaction(&mut self, transaction: TransactionState) -> bool {
        if self.transactions.contains_key(&transaction.transaction_id) {
            return false;
        }
        let connector = self.connector_mut(transaction.connector_id);
        connector.status = ConnectorStatus::Occupied;
        self.transactions
            .insert(transaction.transaction_id.clone(), transaction);
        true
    }

    pub fn end_transaction(&mut self, transaction_id: &str) -> Option<TransactionState> {
        let transaction = self.transactions.remove(transaction_id)?;
        let still_busy = self
            .transactions
            .values()
            .any(|t| t.connector_id == transaction.connector_id);
        if let Some(connector) = self.connectors.get_mut(&transaction.connector_id) {
            if !still_busy && connector.status == ConnectorStatus::Occupied {
                connector.status = ConnectorStatus::Available;
            }
        }
        Some(transaction)
    }

    /// The transaction currently running on a connector, if any
    pub fn active_transaction_on(&mut self, connector_id: i32) -> Option<&mut TransactionState> {
        self.transactions
            .values_mut()
            .find(|t| t.connector_id == connector_id)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// Server-side state of one connected station.
///
/// A new session object is created for every connection, even when a station
/// reconnects under the same id. Reservations past their expiry are released
/// whenever the state is accessed.
#[derive(Debug)]
pub struct StationSession {
    station_id: String,
    connection_id: ConnectionId,
    state: RwLock<StationState>,
}

impl StationSession {
    pub fn new(station_id: impl Into<String>, connection_id: ConnectionId) -> Self {
        Self {
            station_id: station_id.into(),
            connection_id,
            state: RwLock::new(StationState::default()),
        }
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub async fn state(&self) -> RwLockReadGuard<'_, StationState> {
        self.state_mut().await.downgrade()
    }

    pub async fn state_mut(&self) -> RwLockWriteGuard<'_, StationState> {
        let mut state = self.state.write().await;
        for expired in state.purge_expired_reservations(now_ms()) {
            info!(
                station = self.station_id.as_str(),
                "reservation {} on connector {} expired",
                expired.id,
                expired.connector_id
            );
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation(id: i32, connector_id: i32, expiry_ms: u64) -> Reservation {
        Reservation {
            id,
            connector_id,
            id_token: "l33t".into(),
            expiry_ms,
        }
    }

    #[test]
    fn test_connectors_created_lazily() {
        let mut state = StationState::default();
        assert!(state.connector(1).is_none());

        state.set_connector_status(1, ConnectorStatus::Faulted);
        state.set_connector_status(1, ConnectorStatus::Available);
        assert_eq!(state.connector_count(), 1);
        assert_eq!(state.connector(1).map(|c| c.status), Some(ConnectorStatus::Available));
    }

    #[test]
    fn test_reserve_and_cancel() {
        let mut state = StationState::default();
        assert!(state.reserve(reservation(42, 1, 10_000)).is_none());

        let connector = state.connector(1).expect("connector created");
        assert_eq!(connector.status, ConnectorStatus::Reserved);
        assert_eq!(state.reservation(42).map(|r| r.connector_id), Some(1));

        let cancelled = state.cancel_reservation(42).expect("cancelled");
        assert_eq!(cancelled.id, 42);
        let connector = state.connector(1).expect("connector kept");
        assert!(connector.reservation.is_none());
        assert_eq!(connector.status, ConnectorStatus::Available);

        assert!(state.cancel_reservation(42).is_none());
    }

    #[test]
    fn test_reserve_keeps_non_available_status() {
        let mut state = StationState::default();
        state.set_connector_status(2, ConnectorStatus::Faulted);
        state.reserve(reservation(7, 2, 10_000));
        assert_eq!(state.connector(2).map(|c| c.status), Some(ConnectorStatus::Faulted));
    }

    #[test]
    fn test_purge_expired_reservations() {
        let mut state = StationState::default();
        state.reserve(reservation(1, 1, 1_000));
        state.reserve(reservation(2, 2, 5_000));

        let purged = state.purge_expired_reservations(2_000);
        assert_eq!(purged.len(), 1);
        assert_eq!(purged[0].id, 1);
        assert!(state.reservation(1).is_none());
        assert!(state.reservation(2).is_some());
    }

    #[test]
    fn test_transaction_ids_unique() {
        let mut state = StationState::default();
        assert!(state.start_transaction(TransactionState::new("tx-1", 1, 100)));
        assert!(!state.start_transaction(TransactionState::new("tx-1", 2, 200)));
        assert_eq!(state.transaction_count(), 1);
        assert_eq!(state.transaction("tx-1").map(|t| t.connector_id), Some(1));
        assert_eq!(state.connector(1).map(|c| c.status), Some(ConnectorStatus::Occupied));
    }

    #[test]
    fn test_end_transaction_frees_connector() {
        let mut state = StationState::default();
        state.start_transaction(TransactionState::new("tx-1", 1, 100));
        assert!(state.active_transaction_on(1).is_some());

        let ended = state.end_transaction("tx-1").expect("ended");
        assert_eq!(ended.transaction_id, "tx-1");
        assert_eq!(state.connector(1).map(|c| c.status), Some(ConnectorStatus::Available));
        assert!(state.end_transaction("tx-1").is_none());
        assert!(state.active_transaction_on(1).is_none());
    }

    #[tokio::test]
    async fn test_session_state_access() {
        let session = StationSession::new("CS001", 3);
        assert_eq!(session.station_id(), "CS001");
        assert_eq!(session.connection_id(), 3);

        session.state_mut().await.local_list_version = Some(5);
        assert_eq!(session.state().await.local_list_version, Some(5));
    }

    #[tokio::test]
    async fn test_expired_reservation_released_on_access() {
        let session = StationSession::new("CS001", 1);
        {
            let mut state = session.state_mut().await;
            state.reserve(reservation(42, 1, 1));
            state.reserve(reservation(43, 2, u64::MAX));
        }

        let state = session.state().await;
        assert!(state.reservation(42).is_none());
        assert_eq!(state.connector(1).map(|c| c.status), Some(ConnectorStatus::Available));
        assert_eq!(state.reservation(43).map(|r| r.connector_id), Some(2));
        assert_eq!(state.connector(2).map(|c| c.status), Some(ConnectorStatus::Reserved));
    }

    #[tokio::test]
    async fn test_expired_reservation_cannot_be_cancelled() {
        let session = StationSession::new("CS001", 1);
        session.state_mut().await.reserve(reservation(42, 1, 1));

        assert!(session.state_mut().await.cancel_reservation(42).is_none());
    }
}
