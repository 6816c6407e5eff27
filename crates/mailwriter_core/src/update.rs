use crate::{Effect, Msg, RequestCycle, RequestPhase, FAILURE_ALERT};

/// Pure update function: applies a message to the cycle and returns any effects.
pub fn update(mut cycle: RequestCycle, msg: Msg) -> (RequestCycle, Vec<Effect>) {
    let effects = match (cycle.phase(), msg) {
        (RequestPhase::Idle, Msg::Clicked) => {
            cycle.set_phase(RequestPhase::Pending);
            vec![Effect::ApplyView(cycle.view())]
        }
        // Single-flight: a click while busy is inert.
        (_, Msg::Clicked) => Vec::new(),
        (RequestPhase::Pending, Msg::ReplyReceived { reply }) => {
            cycle.set_phase(RequestPhase::Success);
            vec![Effect::InsertReply { reply }]
        }
        (RequestPhase::Pending, Msg::RequestFailed) => {
            cycle.set_phase(RequestPhase::Failed);
            vec![Effect::Alert {
                message: FAILURE_ALERT.to_string(),
            }]
        }
        // Outcomes only count while pending.
        (_, Msg::ReplyReceived { .. } | Msg::RequestFailed) => Vec::new(),
        (RequestPhase::Idle, Msg::Settled) => Vec::new(),
        (_, Msg::Settled) => {
            cycle.set_phase(RequestPhase::Idle);
            vec![Effect::ApplyView(cycle.view())]
        }
    };

    (cycle, effects)
}
