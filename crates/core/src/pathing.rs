//! Pathfinding contract consumed by the combat core.
//!
//! The core never computes routes itself: it files a request, receives a
//! ticket, and polls the ticket once per simulation tick until the service
//! answers. Results may arrive arbitrarily many ticks after the request, so
//! everything that acts on a path must re-check that the owning participant
//! still holds its turn (the action queue enforces this by dropping pending
//! intents on turn end).

use std::collections::BTreeMap;

use crate::types::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathTicket(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathPoll {
    /// Still computing; poll again next tick.
    Pending,
    /// Waypoints from just after `from` up to and including `to`; empty when
    /// `from == to`. Consumed by this poll.
    Ready(Vec<Pos>),
    /// No route, or the ticket is unknown / already consumed.
    Failed,
}

pub trait Pathfinder {
    fn request(&mut self, from: Pos, to: Pos) -> PathTicket;
    fn poll(&mut self, ticket: PathTicket) -> PathPoll;
}

/// Reference pathfinder for an unobstructed plane: walks the rank first,
/// then the file, answering on the first poll.
#[derive(Debug, Default)]
pub struct RookPathfinder {
    next_ticket: u64,
    ready: BTreeMap<u64, Vec<Pos>>,
}

impl RookPathfinder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Pathfinder for RookPathfinder {
    fn request(&mut self, from: Pos, to: Pos) -> PathTicket {
        let mut path = Vec::new();
        let mut cursor = from;
        while cursor.y != to.y {
            cursor.y += (to.y - cursor.y).signum();
            path.push(cursor);
        }
        while cursor.x != to.x {
            cursor.x += (to.x - cursor.x).signum();
            path.push(cursor);
        }
        let ticket = PathTicket(self.next_ticket);
        self.next_ticket += 1;
        self.ready.insert(ticket.0, path);
        ticket
    }

    fn poll(&mut self, ticket: PathTicket) -> PathPoll {
        match self.ready.remove(&ticket.0) {
            Some(path) => PathPoll::Ready(path),
            None => PathPoll::Failed,
        }
    }
}

/// Wraps another pathfinder and holds every answer back a fixed number of
/// polls. Exercises the asynchronous-result handling (AP commit on arrival,
/// stale-result discard) without a real search running in the background.
#[derive(Debug)]
pub struct DelayedPathfinder<P> {
    inner: P,
    delay: u32,
    waits: BTreeMap<u64, u32>,
}

impl<P: Pathfinder> DelayedPathfinder<P> {
    pub fn new(inner: P, delay: u32) -> Self {
        Self { inner, delay, waits: BTreeMap::new() }
    }
}

impl<P: Pathfinder> Pathfinder for DelayedPathfinder<P> {
    fn request(&mut self, from: Pos, to: Pos) -> PathTicket {
        let ticket = self.inner.request(from, to);
        self.waits.insert(ticket.0, self.delay);
        ticket
    }

    fn poll(&mut self, ticket: PathTicket) -> PathPoll {
        if let Some(remaining) = self.waits.get_mut(&ticket.0) {
            if *remaining > 0 {
                *remaining -= 1;
                return PathPoll::Pending;
            }
            self.waits.remove(&ticket.0);
        }
        self.inner.poll(ticket)
    }
}

/// Answers `Failed` to every request. Testing adapter for the
/// path-unavailable branches.
#[derive(Debug, Default)]
pub struct FailingPathfinder {
    next_ticket: u64,
}

impl FailingPathfinder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Pathfinder for FailingPathfinder {
    fn request(&mut self, _from: Pos, _to: Pos) -> PathTicket {
        let ticket = PathTicket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    fn poll(&mut self, _ticket: PathTicket) -> PathPoll {
        PathPoll::Failed
    }
}
