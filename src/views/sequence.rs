use crate::config::ResponseOrdering;

/// Sequence number handed to a request when it is issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets and decides which responses may
/// render under a [`ResponseOrdering`] policy.
#[derive(Debug, Default)]
pub struct RequestSequence {
    issued: u64,
    in_flight: usize,
}

impl RequestSequence {
    pub fn issue(&mut self) -> RequestTicket {
        self.issued += 1;
        self.in_flight += 1;
        RequestTicket(self.issued)
    }

    /// Record that `ticket` finished and report whether its result may be applied.
    pub fn complete(&mut self, ticket: RequestTicket, ordering: ResponseOrdering) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        match ordering {
            ResponseOrdering::LatestIssued => ticket.0 == self.issued,
            ResponseOrdering::LastArrival => true,
        }
    }

    pub fn latest(&self) -> Option<RequestTicket> {
        (self.issued > 0).then_some(RequestTicket(self.issued))
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}
