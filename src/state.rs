//! Turn-taking state shared across the four connection processors.

use rand::Rng;

/// One of the three AI debate participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Moderator,
    Innovate,
    Safety,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Moderator, Persona::Innovate, Persona::Safety];

    /// The other two personas, whose conversations are kept in sync when
    /// this one finishes speaking.
    pub fn others(self) -> [Persona; 2] {
        match self {
            Persona::Moderator => [Persona::Innovate, Persona::Safety],
            Persona::Innovate => [Persona::Moderator, Persona::Safety],
            Persona::Safety => [Persona::Moderator, Persona::Innovate],
        }
    }

    pub fn index(self) -> usize {
        match self {
            Persona::Moderator => 0,
            Persona::Innovate => 1,
            Persona::Safety => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Persona::Moderator => "Moderator",
            Persona::Innovate => "Innovate",
            Persona::Safety => "Safety",
        }
    }

    /// Uniform pick of who answers next. Deliberately memoryless: the same
    /// persona can hold the floor twice in a row.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Persona {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Who currently holds the conversational floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Speaker {
    Moderator,
    Innovate,
    Safety,
    Client,
    #[default]
    None,
}

impl Speaker {
    /// The persona holding the floor, if an AI is (about to be) speaking.
    pub fn persona(self) -> Option<Persona> {
        match self {
            Speaker::Moderator => Some(Persona::Moderator),
            Speaker::Innovate => Some(Persona::Innovate),
            Speaker::Safety => Some(Persona::Safety),
            Speaker::Client | Speaker::None => None,
        }
    }
}

impl From<Persona> for Speaker {
    fn from(persona: Persona) -> Self {
        match persona {
            Persona::Moderator => Speaker::Moderator,
            Persona::Innovate => Speaker::Innovate,
            Persona::Safety => Speaker::Safety,
        }
    }
}

/// Snapshot of the shared turn state.
///
/// Never mutated in place: a processor publishes a whole replacement value
/// and every processor (the originator included) receives it, so the copies
/// converge without a lock. Brief skew between copies is tolerated by
/// design — the snapshots are idempotent, not deltas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    /// Identifier of the response currently streaming from a persona.
    pub active_response_id: Option<String>,
    pub speaker: Speaker,
    /// Sample rate of the human-facing socket, fixed for the session and
    /// carried here purely so every processor has it at hand.
    pub client_sample_rate: u32,
}

impl TurnState {
    pub fn new(client_sample_rate: u32) -> Self {
        Self {
            active_response_id: None,
            speaker: Speaker::None,
            client_sample_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn others_never_include_self() {
        for persona in Persona::ALL {
            let others = persona.others();
            assert_eq!(others.len(), 2);
            assert!(!others.contains(&persona));
            assert_ne!(others[0], others[1]);
        }
    }

    #[test]
    fn speaker_maps_back_to_persona() {
        for persona in Persona::ALL {
            assert_eq!(Speaker::from(persona).persona(), Some(persona));
        }
        assert_eq!(Speaker::Client.persona(), None);
        assert_eq!(Speaker::None.persona(), None);
    }

    #[test]
    fn selection_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let trials = 10_000u32;
        let mut counts = [0u32; 3];
        for _ in 0..trials {
            counts[Persona::choose(&mut rng).index()] += 1;
        }
        let expected = trials / 3;
        let tolerance = trials / 20; // 5%
        for count in counts {
            assert!(
                count.abs_diff(expected) < tolerance,
                "skewed selection: {counts:?}"
            );
        }
    }

    #[test]
    fn fresh_state_has_no_floor_holder() {
        let state = TurnState::new(44_100);
        assert_eq!(state.speaker, Speaker::None);
        assert_eq!(state.active_response_id, None);
        assert_eq!(state.client_sample_rate, 44_100);
    }
}
