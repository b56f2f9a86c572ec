use serde::{Deserialize, Serialize};
use std::fmt;

/// Proposal identifier: a per-proposer round counter with the proposer's
/// node index as tiebreak. Ordering is round-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalNumber {
    pub round: u64,
    pub node: u32,
}

impl fmt::Display for ProposalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.round, self.node)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    #[serde(rename = "PROMISE")]
    Promise,
    #[serde(rename = "ACCEPT")]
    Accept,
    #[serde(rename = "REJECT")]
    Reject,
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Vote::Promise => "PROMISE",
            Vote::Accept => "ACCEPT",
            Vote::Reject => "REJECT",
        };
        f.write_str(s)
    }
}

/// A client command, tokenised from the raw wire string.
///
/// Commands are split into at most three parts on single spaces, so a PUT
/// value may itself contain spaces. The operation verb is case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Put { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Recognised operation with the wrong shape; answered with "NULL".
    Malformed,
    /// Unrecognised operation verb; answered with "Invalid command".
    UnknownOperation,
}

impl Command {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = raw.splitn(3, ' ').collect();
        match parts[0].to_uppercase().as_str() {
            "PUT" => {
                if parts.len() == 3 {
                    Ok(Command::Put {
                        key: parts[1].to_string(),
                        value: parts[2].to_string(),
                    })
                } else {
                    Err(ParseError::Malformed)
                }
            }
            "GET" => {
                if parts.len() == 2 && !parts[1].trim().is_empty() {
                    Ok(Command::Get {
                        key: parts[1].to_string(),
                    })
                } else {
                    Err(ParseError::Malformed)
                }
            }
            "DELETE" => {
                if parts.len() == 2 {
                    Ok(Command::Delete {
                        key: parts[1].to_string(),
                    })
                } else {
                    Err(ParseError::Malformed)
                }
            }
            _ => Err(ParseError::UnknownOperation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposal_numbers_order_by_round_first() {
        let low = ProposalNumber { round: 1, node: 4 };
        let high = ProposalNumber { round: 2, node: 0 };
        assert!(high > low);
    }

    #[test]
    fn proposal_numbers_break_ties_on_node() {
        let a = ProposalNumber { round: 3, node: 0 };
        let b = ProposalNumber { round: 3, node: 1 };
        assert!(b > a);
        assert!(a >= a);
    }
}
