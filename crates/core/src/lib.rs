#![forbid(unsafe_code)]

pub mod code {
    /// Year/month bucket a ticket code belongs to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Period {
        year: i32,
        month: u8,
    }

    impl Period {
        pub fn new(year: i32, month: u8) -> Result<Self, TicketCodeError> {
            if !(1..=9999).contains(&year) {
                return Err(TicketCodeError::InvalidYear);
            }
            if !(1..=12).contains(&month) {
                return Err(TicketCodeError::InvalidMonth);
            }
            Ok(Self { year, month })
        }

        pub fn year(self) -> i32 {
            self.year
        }

        pub fn month(self) -> u8 {
            self.month
        }

        /// `YYYY/MM` prefix shared by every code issued in this bucket.
        pub fn prefix(self) -> String {
            format!("{:04}/{:02}", self.year, self.month)
        }
    }

    /// Human-readable ticket identifier, `YYYY/MM/NNN`. The sequence resets
    /// per calendar month and is zero-padded to three digits; past 999 it
    /// simply grows wider.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TicketCode {
        period: Period,
        seq: u32,
    }

    impl TicketCode {
        pub fn new(period: Period, seq: u32) -> Result<Self, TicketCodeError> {
            if seq == 0 {
                return Err(TicketCodeError::InvalidSequence);
            }
            Ok(Self { period, seq })
        }

        pub fn period(self) -> Period {
            self.period
        }

        pub fn seq(self) -> u32 {
            self.seq
        }

        pub fn parse(value: &str) -> Result<Self, TicketCodeError> {
            if value.is_empty() {
                return Err(TicketCodeError::Empty);
            }
            let mut segments = value.split('/');
            let (Some(year), Some(month), Some(seq), None) = (
                segments.next(),
                segments.next(),
                segments.next(),
                segments.next(),
            ) else {
                return Err(TicketCodeError::MalformedShape);
            };

            let year = parse_digits(year).ok_or(TicketCodeError::InvalidYear)?;
            let year = i32::try_from(year).map_err(|_| TicketCodeError::InvalidYear)?;
            let month = parse_digits(month).ok_or(TicketCodeError::InvalidMonth)?;
            let month = u8::try_from(month).map_err(|_| TicketCodeError::InvalidMonth)?;
            let period = Period::new(year, month)?;

            let seq = parse_digits(seq).ok_or(TicketCodeError::InvalidSequence)?;
            let seq = u32::try_from(seq).map_err(|_| TicketCodeError::InvalidSequence)?;
            Self::new(period, seq)
        }
    }

    impl std::fmt::Display for TicketCode {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}/{:03}", self.period.prefix(), self.seq)
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum TicketCodeError {
        Empty,
        MalformedShape,
        InvalidYear,
        InvalidMonth,
        InvalidSequence,
    }

    fn parse_digits(segment: &str) -> Option<u64> {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        segment.parse::<u64>().ok()
    }
}

pub mod model {
    /// Actor recorded on system-authored history entries (creation records,
    /// status transitions).
    pub const SYSTEM_ACTOR: &str = "system";

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Status {
        Pending,
        InProgress,
        AwaitingResponse,
        Closed,
    }

    impl Status {
        pub const ALL: [Status; 4] = [
            Status::Pending,
            Status::InProgress,
            Status::AwaitingResponse,
            Status::Closed,
        ];

        pub fn as_str(self) -> &'static str {
            match self {
                Status::Pending => "pending",
                Status::InProgress => "in_progress",
                Status::AwaitingResponse => "awaiting_response",
                Status::Closed => "closed",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            match value {
                "pending" => Some(Status::Pending),
                "in_progress" => Some(Status::InProgress),
                "awaiting_response" => Some(Status::AwaitingResponse),
                "closed" => Some(Status::Closed),
                _ => None,
            }
        }

        pub fn is_closed(self) -> bool {
            matches!(self, Status::Closed)
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Priority {
        Normal,
        Urgent,
        VeryUrgent,
    }

    impl Priority {
        pub const ALL: [Priority; 3] = [Priority::Normal, Priority::Urgent, Priority::VeryUrgent];

        pub fn as_str(self) -> &'static str {
            match self {
                Priority::Normal => "normal",
                Priority::Urgent => "urgent",
                Priority::VeryUrgent => "very_urgent",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            match value {
                "normal" => Some(Priority::Normal),
                "urgent" => Some(Priority::Urgent),
                "very_urgent" => Some(Priority::VeryUrgent),
                _ => None,
            }
        }
    }
}
