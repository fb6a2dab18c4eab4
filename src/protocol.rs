//! Wire schema for the native boundary.
//!
//! The controlling side and the native engine share no memory; everything
//! crosses as messages shaped like [`WireRequest`] and [`WireReply`]. A
//! request either carries a correlation id (and expects exactly one reply
//! tagged with that id) or is a pure side effect travelling inside the
//! `batch` of a later correlated request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::BridgeError;

/// Correlation id for a request/reply pair. Monotonically increasing per
/// transport instance.
pub type RequestId = u64;

/// Opaque native handle naming a node in the engine's tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Opaque native handle naming a registered declaration set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StyleId(pub u64);

/// The fixed method catalogue understood by the native engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    // Tree
    CreateElementNode,
    CreateTextNode,
    AppendChild,
    AppendToContainer,
    SetStyles,
    SetTextContent,

    // Listeners
    AddEventListener,
    RemoveEventListener,

    // Raw input forwarded from the host
    ReceiveKeyEvent,
    ReceiveMouseEvent,

    // Stylesheet
    RegisterStyle,
    UnregisterStyle,

    // Frame exchange
    GetFrameDiff,
    PostFrameDiff,
    GetResourceUpdates,
    PollEvents,

    // Housekeeping / resources
    CollectGarbage,
    SetFrameSize,
    LoadFont,
    LoadImage,
    PrintDiag,
}

/// A void call queued for fire-and-forget delivery. Delivered only when
/// piggybacked on a following correlated request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCall {
    pub method: Method,
    pub args: Vec<Value>,
}

/// One message sent to the native boundary. `id` is present for correlated
/// requests only; `batch` carries every void call queued since the previous
/// correlated request, in original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireRequest {
    pub id: Option<RequestId>,
    pub batch: Vec<PendingCall>,
    pub method: Method,
    pub args: Vec<Value>,
}

/// One reply from the native boundary, matched to a request by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireReply {
    pub id: RequestId,
    pub retval: Value,
}

/// An engine-synthesized notification pairing a target handle with an
/// event-type code. Listeners are invoked with no payload; they re-read
/// current state instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualEvent {
    pub target: NodeId,
    pub event_type: u32,
}

/// Payload of one frame round trip. In remote mode only `polled_events`
/// is populated; local mode carries the full set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameResult {
    pub display_list_diff: Option<Value>,
    pub resource_updates: Option<Value>,
    pub polled_events: Vec<VirtualEvent>,
}

impl FrameResult {
    pub fn from_retval(retval: Value) -> Result<Self, BridgeError> {
        serde_json::from_value(retval).map_err(|e| BridgeError::MalformedReply(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_names_use_camel_case_on_the_wire() {
        assert_eq!(serde_json::to_value(Method::CreateElementNode).unwrap(), json!("createElementNode"));
        assert_eq!(serde_json::to_value(Method::AppendToContainer).unwrap(), json!("appendToContainer"));
        assert_eq!(serde_json::to_value(Method::PostFrameDiff).unwrap(), json!("postFrameDiff"));
    }

    #[test]
    fn wire_request_round_trips() {
        let req = WireRequest {
            id: Some(7),
            batch: vec![PendingCall {
                method: Method::AppendChild,
                args: vec![json!(1), json!(2)],
            }],
            method: Method::GetFrameDiff,
            args: vec![],
        };

        let encoded = serde_json::to_string(&req).unwrap();
        let decoded: WireRequest = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn frame_result_tolerates_missing_fields() {
        let frame = FrameResult::from_retval(json!({ "polledEvents": [] })).unwrap();
        assert!(frame.display_list_diff.is_none());
        assert!(frame.polled_events.is_empty());

        let frame = FrameResult::from_retval(json!({
            "displayListDiff": [],
            "resourceUpdates": [],
            "polledEvents": [{ "target": 3, "eventType": 15 }],
        }))
        .unwrap();
        assert_eq!(frame.polled_events[0].target, NodeId(3));
        assert_eq!(frame.polled_events[0].event_type, 15);
    }

    #[test]
    fn frame_result_rejects_garbage() {
        assert!(FrameResult::from_retval(json!("nonsense")).is_err());
    }
}
