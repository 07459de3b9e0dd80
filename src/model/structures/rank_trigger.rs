use serde::{Deserialize, Serialize};
use std::fmt;

/// What caused a rank to be (re)computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankTrigger {
    Create,
    Heat,
    Boost
}

impl fmt::Display for RankTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RankTrigger::Create => "create",
            RankTrigger::Heat => "heat",
            RankTrigger::Boost => "boost"
        };

        write!(f, "{}", name)
    }
}
