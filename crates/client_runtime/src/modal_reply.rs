//! Result channel for modal interactions.
//!
//! A caller that needs to know how the user completed an overlay pushes it with a reply channel
//! and awaits the [`ModalReplyReceiver`]. The UI layer resolves the instance once the user acts.
//! If the instance leaves the stack first, the receiver yields [`ModalReply::Dismissed`].

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModalReply {
    /// Confirmation-style completion (confirm, unlink, import finished, sync linked).
    Confirmed,
    /// Closed without completing, or removed from the stack before a reply was sent.
    Dismissed,
    /// Picker selection.
    Selected { id: String, name: Option<String> },
    /// Form submission.
    Submitted(Value),
    /// Named follow-up action from a menu overlay.
    Action { action: String, args: Option<Value> },
}

pub(crate) type ModalReplySender = oneshot::Sender<ModalReply>;

pub(crate) fn reply_channel() -> (ModalReplySender, ModalReplyReceiver) {
    let (tx, rx) = oneshot::channel();
    (tx, ModalReplyReceiver { inner: rx })
}

/// Future resolving with the reply for one stacked modal instance.
#[derive(Debug)]
#[must_use = "a reply receiver does nothing unless awaited"]
pub struct ModalReplyReceiver {
    inner: oneshot::Receiver<ModalReply>,
}

impl Future for ModalReplyReceiver {
    type Output = ModalReply;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner)
            .poll(cx)
            .map(|result| result.unwrap_or(ModalReply::Dismissed))
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn receiver_yields_sent_reply() {
        let (tx, rx) = reply_channel();
        tx.send(ModalReply::Selected {
            id: "acct-1".into(),
            name: Some("Checking".into()),
        })
        .expect("receiver alive");
        assert_eq!(
            block_on(rx),
            ModalReply::Selected {
                id: "acct-1".into(),
                name: Some("Checking".into())
            }
        );
    }

    #[test]
    fn dropped_sender_reads_as_dismissed() {
        let (tx, rx) = reply_channel();
        drop(tx);
        assert_eq!(block_on(rx), ModalReply::Dismissed);
    }
}
