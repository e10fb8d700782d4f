/// Ticket workflow states as stored in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_i32(&self) -> i32 {
        match self {
            TicketStatus::Open => 0,
            TicketStatus::Pending => 1,
            TicketStatus::InProgress => 2,
            TicketStatus::Resolved => 3,
            TicketStatus::Closed => 4,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(TicketStatus::Open),
            1 => Some(TicketStatus::Pending),
            2 => Some(TicketStatus::InProgress),
            3 => Some(TicketStatus::Resolved),
            4 => Some(TicketStatus::Closed),
            _ => None,
        }
    }

    /// States counted as resolved on the dashboard.
    pub fn is_settled(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}
