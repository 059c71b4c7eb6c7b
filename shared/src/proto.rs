//! Protocol messages exchanged between charging stations and the server.
//!
//! Every frame on the wire is a [`Frame`] carrying exactly one of a call
//! (request), a call result (response) or a call error. Payload messages are
//! grouped by the feature category they belong to.

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Frame {
    /// Identity of the station the frame belongs to
    #[prost(string, tag = "1")]
    pub station_id: String,
    /// Correlates a call with its result or error
    #[prost(string, tag = "2")]
    pub message_id: String,
    #[prost(uint64, tag = "3")]
    pub timestamp_ms: u64,
    #[prost(oneof = "FrameBody", tags = "10, 11, 12")]
    pub body: Option<FrameBody>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum FrameBody {
    #[prost(message, tag = "10")]
    Call(Call),
    #[prost(message, tag = "11")]
    CallResult(CallResult),
    #[prost(message, tag = "12")]
    CallError(CallError),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Call {
    #[prost(
        oneof = "Request",
        tags = "1, 2, 3, 4, 5, 6, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30"
    )]
    pub request: Option<Request>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CallResult {
    #[prost(
        oneof = "Response",
        tags = "1, 2, 3, 4, 5, 6, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30"
    )]
    pub response: Option<Response>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CallError {
    #[prost(enumeration = "ErrorCode", tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ErrorCode {
    GenericError = 0,
    NotImplemented = 1,
    NotSupported = 2,
    InternalError = 3,
    ProtocolError = 4,
    SecurityError = 5,
    FormationViolation = 6,
    PropertyConstraintViolation = 7,
}

/// Requests. Tags 1..=6 are initiated by the server, 20.. by stations.
#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum Request {
    #[prost(message, tag = "1")]
    ReserveNow(ReserveNowRequest),
    #[prost(message, tag = "2")]
    CancelReservation(CancelReservationRequest),
    #[prost(message, tag = "3")]
    GetLocalListVersion(GetLocalListVersionRequest),
    #[prost(message, tag = "4")]
    SetVariables(SetVariablesRequest),
    #[prost(message, tag = "5")]
    TriggerMessage(TriggerMessageRequest),
    #[prost(message, tag = "6")]
    CostUpdated(CostUpdatedRequest),
    #[prost(message, tag = "20")]
    Authorize(AuthorizeRequest),
    #[prost(message, tag = "21")]
    Heartbeat(HeartbeatRequest),
    #[prost(message, tag = "22")]
    StatusNotification(StatusNotificationRequest),
    #[prost(message, tag = "23")]
    LogStatusNotification(LogStatusNotificationRequest),
    #[prost(message, tag = "24")]
    NotifyEvent(NotifyEventRequest),
    #[prost(message, tag = "25")]
    FirmwareStatusNotification(FirmwareStatusNotificationRequest),
    #[prost(message, tag = "26")]
    MeterValues(MeterValuesRequest),
    #[prost(message, tag = "27")]
    BootNotification(BootNotificationRequest),
    #[prost(message, tag = "28")]
    NotifyReport(NotifyReportRequest),
    #[prost(message, tag = "29")]
    ReservationStatusUpdate(ReservationStatusUpdateRequest),
    #[prost(message, tag = "30")]
    TransactionEvent(TransactionEventRequest),
}

/// Responses, tagged identically to the request they answer.
#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum Response {
    #[prost(message, tag = "1")]
    ReserveNow(ReserveNowResponse),
    #[prost(message, tag = "2")]
    CancelReservation(CancelReservationResponse),
    #[prost(message, tag = "3")]
    GetLocalListVersion(GetLocalListVersionResponse),
    #[prost(message, tag = "4")]
    SetVariables(SetVariablesResponse),
    #[prost(message, tag = "5")]
    TriggerMessage(TriggerMessageResponse),
    #[prost(message, tag = "6")]
    CostUpdated(CostUpdatedResponse),
    #[prost(message, tag = "20")]
    Authorize(AuthorizeResponse),
    #[prost(message, tag = "21")]
    Heartbeat(HeartbeatResponse),
    #[prost(message, tag = "22")]
    StatusNotification(StatusNotificationResponse),
    #[prost(message, tag = "23")]
    LogStatusNotification(LogStatusNotificationResponse),
    #[prost(message, tag = "24")]
    NotifyEvent(NotifyEventResponse),
    #[prost(message, tag = "25")]
    FirmwareStatusNotification(FirmwareStatusNotificationResponse),
    #[prost(message, tag = "26")]
    MeterValues(MeterValuesResponse),
    #[prost(message, tag = "27")]
    BootNotification(BootNotificationResponse),
    #[prost(message, tag = "28")]
    NotifyReport(NotifyReportResponse),
    #[prost(message, tag = "29")]
    ReservationStatusUpdate(ReservationStatusUpdateResponse),
    #[prost(message, tag = "30")]
    TransactionEvent(TransactionEventResponse),
}

// ---------------------------------------------------------------------------
// Common types
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdToken {
    #[prost(string, tag = "1")]
    pub id_token: String,
    #[prost(enumeration = "IdTokenType", tag = "2")]
    pub kind: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum IdTokenType {
    Central = 0,
    EMaid = 1,
    Iso14443 = 2,
    KeyCode = 3,
    Local = 4,
    NoAuthorization = 5,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IdTokenInfo {
    #[prost(enumeration = "AuthorizationStatus", tag = "1")]
    pub status: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum AuthorizationStatus {
    Unknown = 0,
    Accepted = 1,
    Blocked = 2,
    Expired = 3,
    Invalid = 4,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SampledValue {
    #[prost(double, tag = "1")]
    pub value: f64,
    #[prost(string, tag = "2")]
    pub measurand: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MeterValue {
    #[prost(uint64, tag = "1")]
    pub timestamp_ms: u64,
    #[prost(message, repeated, tag = "2")]
    pub sampled_value: Vec<SampledValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Component {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Variable {
    #[prost(string, tag = "1")]
    pub name: String,
}

// ---------------------------------------------------------------------------
// Reservation
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReserveNowRequest {
    /// Reservation id
    #[prost(int32, tag = "1")]
    pub id: i32,
    #[prost(uint64, tag = "2")]
    pub expiry_ms: u64,
    #[prost(message, optional, tag = "3")]
    pub id_token: Option<IdToken>,
    #[prost(int32, tag = "4")]
    pub connector_id: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReserveNowResponse {
    #[prost(enumeration = "ReserveNowStatus", tag = "1")]
    pub status: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ReserveNowStatus {
    Rejected = 0,
    Accepted = 1,
    Faulted = 2,
    Occupied = 3,
    Unavailable = 4,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CancelReservationRequest {
    #[prost(int32, tag = "1")]
    pub reservation_id: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CancelReservationResponse {
    #[prost(enumeration = "CancelReservationStatus", tag = "1")]
    pub status: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum CancelReservationStatus {
    Rejected = 0,
    Accepted = 1,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReservationStatusUpdateRequest {
    #[prost(int32, tag = "1")]
    pub reservation_id: i32,
    #[prost(enumeration = "ReservationUpdateStatus", tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReservationStatusUpdateResponse {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ReservationUpdateStatus {
    Expired = 0,
    Removed = 1,
}

// ---------------------------------------------------------------------------
// Local authorization list
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetLocalListVersionRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetLocalListVersionResponse {
    #[prost(int32, tag = "1")]
    pub version_number: i32,
}

// ---------------------------------------------------------------------------
// Provisioning
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetVariableData {
    #[prost(enumeration = "AttributeType", tag = "1")]
    pub attribute_type: i32,
    #[prost(string, tag = "2")]
    pub attribute_value: String,
    #[prost(message, optional, tag = "3")]
    pub component: Option<Component>,
    #[prost(message, optional, tag = "4")]
    pub variable: Option<Variable>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum AttributeType {
    Actual = 0,
    Target = 1,
    MinSet = 2,
    MaxSet = 3,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetVariablesRequest {
    #[prost(message, repeated, tag = "1")]
    pub set_variable_data: Vec<SetVariableData>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetVariableResult {
    #[prost(enumeration = "SetVariableStatus", tag = "1")]
    pub attribute_status: i32,
    #[prost(message, optional, tag = "2")]
    pub component: Option<Component>,
    #[prost(message, optional, tag = "3")]
    pub variable: Option<Variable>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SetVariableStatus {
    Rejected = 0,
    Accepted = 1,
    UnknownComponent = 2,
    UnknownVariable = 3,
    NotSupported = 4,
    RebootRequired = 5,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetVariablesResponse {
    #[prost(message, repeated, tag = "1")]
    pub set_variable_result: Vec<SetVariableResult>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChargingStation {
    #[prost(string, tag = "1")]
    pub model: String,
    #[prost(string, tag = "2")]
    pub vendor_name: String,
    #[prost(string, tag = "3")]
    pub firmware_version: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BootNotificationRequest {
    #[prost(enumeration = "BootReason", tag = "1")]
    pub reason: i32,
    #[prost(message, optional, tag = "2")]
    pub charging_station: Option<ChargingStation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum BootReason {
    Unknown = 0,
    PowerUp = 1,
    FirmwareUpdate = 2,
    RemoteReset = 3,
    Watchdog = 4,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BootNotificationResponse {
    #[prost(uint64, tag = "1")]
    pub current_time_ms: u64,
    /// Heartbeat interval in seconds
    #[prost(uint32, tag = "2")]
    pub interval: u32,
    #[prost(enumeration = "RegistrationStatus", tag = "3")]
    pub status: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RegistrationStatus {
    Rejected = 0,
    Accepted = 1,
    Pending = 2,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NotifyReportRequest {
    #[prost(int32, tag = "1")]
    pub request_id: i32,
    #[prost(int32, tag = "2")]
    pub seq_no: i32,
    #[prost(bool, tag = "3")]
    pub tbc: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NotifyReportResponse {}

// ---------------------------------------------------------------------------
// Remote control
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TriggerMessageRequest {
    #[prost(enumeration = "MessageTrigger", tag = "1")]
    pub requested_message: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MessageTrigger {
    BootNotification = 0,
    Heartbeat = 1,
    LogStatusNotification = 2,
    FirmwareStatusNotification = 3,
    MeterValues = 4,
    StatusNotification = 5,
    TransactionEvent = 6,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TriggerMessageResponse {
    #[prost(enumeration = "TriggerMessageStatus", tag = "1")]
    pub status: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TriggerMessageStatus {
    Rejected = 0,
    Accepted = 1,
    NotImplemented = 2,
}

// ---------------------------------------------------------------------------
// Tariff and cost
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CostUpdatedRequest {
    #[prost(double, tag = "1")]
    pub total_cost: f64,
    #[prost(string, tag = "2")]
    pub transaction_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CostUpdatedResponse {}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthorizeRequest {
    #[prost(message, optional, tag = "1")]
    pub id_token: Option<IdToken>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthorizeResponse {
    #[prost(message, optional, tag = "1")]
    pub id_token_info: Option<IdTokenInfo>,
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeartbeatRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeartbeatResponse {
    #[prost(uint64, tag = "1")]
    pub current_time_ms: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatusNotificationRequest {
    #[prost(uint64, tag = "1")]
    pub timestamp_ms: u64,
    #[prost(enumeration = "ConnectorStatus", tag = "2")]
    pub connector_status: i32,
    #[prost(int32, tag = "3")]
    pub connector_id: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatusNotificationResponse {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ConnectorStatus {
    Available = 0,
    Occupied = 1,
    Reserved = 2,
    Unavailable = 3,
    Faulted = 4,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogStatusNotificationRequest {
    #[prost(enumeration = "UploadLogStatus", tag = "1")]
    pub status: i32,
    #[prost(int32, tag = "2")]
    pub request_id: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogStatusNotificationResponse {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum UploadLogStatus {
    Idle = 0,
    Uploading = 1,
    Uploaded = 2,
    UploadFailure = 3,
    BadMessage = 4,
    PermissionDenied = 5,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EventData {
    #[prost(int32, tag = "1")]
    pub event_id: i32,
    #[prost(string, tag = "2")]
    pub trigger: String,
    #[prost(string, tag = "3")]
    pub actual_value: String,
    #[prost(message, optional, tag = "4")]
    pub component: Option<Component>,
    #[prost(message, optional, tag = "5")]
    pub variable: Option<Variable>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NotifyEventRequest {
    #[prost(uint64, tag = "1")]
    pub generated_at_ms: u64,
    #[prost(int32, tag = "2")]
    pub seq_no: i32,
    #[prost(bool, tag = "3")]
    pub tbc: bool,
    #[prost(message, repeated, tag = "4")]
    pub event_data: Vec<EventData>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NotifyEventResponse {}

// ---------------------------------------------------------------------------
// Firmware
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FirmwareStatusNotificationRequest {
    #[prost(enumeration = "FirmwareStatus", tag = "1")]
    pub status: i32,
    #[prost(int32, tag = "2")]
    pub request_id: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FirmwareStatusNotificationResponse {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum FirmwareStatus {
    Idle = 0,
    Downloading = 1,
    Downloaded = 2,
    DownloadFailed = 3,
    Installing = 4,
    Installed = 5,
    InstallationFailed = 6,
}

// ---------------------------------------------------------------------------
// Metering
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MeterValuesRequest {
    #[prost(int32, tag = "1")]
    pub connector_id: i32,
    #[prost(message, repeated, tag = "2")]
    pub meter_value: Vec<MeterValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MeterValuesResponse {}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionInfo {
    #[prost(string, tag = "1")]
    pub transaction_id: String,
    #[prost(enumeration = "ChargingState", tag = "2")]
    pub charging_state: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ChargingState {
    Idle = 0,
    EvConnected = 1,
    Charging = 2,
    SuspendedEv = 3,
    SuspendedEvse = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TransactionEventType {
    Started = 0,
    Updated = 1,
    Ended = 2,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionEventRequest {
    #[prost(enumeration = "TransactionEventType", tag = "1")]
    pub event_type: i32,
    #[prost(uint64, tag = "2")]
    pub timestamp_ms: u64,
    #[prost(int32, tag = "3")]
    pub seq_no: i32,
    #[prost(message, optional, tag = "4")]
    pub transaction_info: Option<TransactionInfo>,
    #[prost(int32, tag = "5")]
    pub connector_id: i32,
    #[prost(message, optional, tag = "6")]
    pub id_token: Option<IdToken>,
    #[prost(int32, optional, tag = "7")]
    pub reservation_id: Option<i32>,
    #[prost(message, repeated, tag = "8")]
    pub meter_value: Vec<MeterValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionEventResponse {
    #[prost(message, optional, tag = "1")]
    pub id_token_info: Option<IdTokenInfo>,
}
