#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Channel boundary between the two Bug Duel devices.
//!
//! The protocol is a one-way-at-a-time message exchange with no
//! acknowledgement, sequencing, or retransmission. Readiness polls never
//! block; a send attempted against a busy channel is the caller's decision
//! to drop or defer. The [`Outbox`] makes the deferral explicit: messages
//! queued there survive busy ticks and drain whenever the channel reports
//! write readiness, which is the bounded-retry contract the terminal
//! GAMEOVER announcements rely on.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use bug_duel_core::Message;
use thiserror::Error;

/// Failure reported when a send violates the channel's readiness contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The outbound buffer had no free slot; the message was not accepted.
    #[error("outbound buffer is full")]
    Busy,
}

/// Non-blocking, half-duplex message channel between two devices.
pub trait Channel {
    /// Reports whether a send would currently be accepted.
    fn ready_to_write(&self) -> bool;

    /// Reports whether a message is waiting to be consumed.
    fn ready_to_read(&self) -> bool;

    /// Hands one message to the link. Callers gate on [`Channel::ready_to_write`];
    /// sending against a busy link fails without transferring anything.
    fn send(&mut self, message: Message) -> Result<(), LinkError>;

    /// Consumes at most one pending message.
    fn recv(&mut self) -> Option<Message>;
}

#[derive(Debug)]
struct LinkQueue {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl LinkQueue {
    fn bounded(capacity: usize) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            messages: VecDeque::new(),
            capacity,
        }))
    }
}

/// One end of an in-memory point-to-point link.
///
/// Both endpoints share a pair of bounded queues, so write readiness on one
/// side reflects how much the other side has left unread. This backs the
/// test harness and the CLI; production wiring substitutes the serial link.
#[derive(Debug)]
pub struct LoopbackEndpoint {
    outbound: Rc<RefCell<LinkQueue>>,
    inbound: Rc<RefCell<LinkQueue>>,
}

impl LoopbackEndpoint {
    /// Creates a connected pair of endpoints whose queues hold at most
    /// `capacity` undelivered messages per direction.
    #[must_use]
    pub fn pair(capacity: usize) -> (Self, Self) {
        let left_to_right = LinkQueue::bounded(capacity);
        let right_to_left = LinkQueue::bounded(capacity);
        (
            Self {
                outbound: Rc::clone(&left_to_right),
                inbound: Rc::clone(&right_to_left),
            },
            Self {
                outbound: right_to_left,
                inbound: left_to_right,
            },
        )
    }
}

impl Channel for LoopbackEndpoint {
    fn ready_to_write(&self) -> bool {
        let queue = self.outbound.borrow();
        queue.messages.len() < queue.capacity
    }

    fn ready_to_read(&self) -> bool {
        !self.inbound.borrow().messages.is_empty()
    }

    fn send(&mut self, message: Message) -> Result<(), LinkError> {
        let mut queue = self.outbound.borrow_mut();
        if queue.messages.len() >= queue.capacity {
            return Err(LinkError::Busy);
        }
        queue.messages.push_back(message);
        Ok(())
    }

    fn recv(&mut self) -> Option<Message> {
        self.inbound.borrow_mut().messages.pop_front()
    }
}

/// Explicit outbound queue with an at-most-once, possibly-deferred contract.
///
/// Enqueued messages are not guaranteed to leave during any particular tick;
/// they drain in order whenever [`Outbox::flush`] finds the channel ready.
/// Nothing is ever duplicated: each message is handed to the link exactly
/// once or still pending.
#[derive(Debug, Default)]
pub struct Outbox {
    pending: VecDeque<Message>,
}

impl Outbox {
    /// Creates an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a message for delivery at the next writable opportunity.
    pub fn enqueue(&mut self, message: Message) {
        self.pending.push_back(message);
    }

    /// Drains pending messages while the channel accepts them.
    ///
    /// Returns how many messages were handed to the link this call.
    pub fn flush(&mut self, channel: &mut dyn Channel) -> usize {
        let mut sent = 0;
        while channel.ready_to_write() {
            let Some(message) = self.pending.pop_front() else {
                break;
            };
            if channel.send(message).is_err() {
                self.pending.push_front(message);
                break;
            }
            sent += 1;
        }
        sent
    }

    /// Reports whether every queued message has been handed to the link.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of messages still awaiting a writable tick.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
