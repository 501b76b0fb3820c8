//! Failure utterances
//!
//! Fire-and-forget: the acquisition logic asks for a line to be spoken and
//! never checks whether it was. Dropped lines are not an error; absence of a
//! complaint must never be read as success.

use crate::core::types::{AgentId, Ident, Tick};
use ahash::AHashMap;

/// Presentation collaborator receiving utterance requests
pub trait SpeechSink {
    /// Request a line, deduplicated by identifier and throttled to at most
    /// one occurrence per `min_interval` ticks per agent
    fn speak(&mut self, agent: AgentId, utterance: &Ident, min_interval: Tick, now: Tick);
}

/// A line that made it past the throttle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenLine {
    pub tick: Tick,
    pub agent: AgentId,
    pub utterance: Ident,
}

/// Records throttled utterances; the demo prints them, tests assert on them
pub struct SpeechLog {
    last_spoken: AHashMap<(AgentId, Ident), Tick>,
    pub lines: Vec<SpokenLine>,
}

impl SpeechLog {
    pub fn new() -> Self {
        Self {
            last_spoken: AHashMap::new(),
            lines: Vec::new(),
        }
    }
}

impl Default for SpeechLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSink for SpeechLog {
    fn speak(&mut self, agent: AgentId, utterance: &Ident, min_interval: Tick, now: Tick) {
        let key = (agent, utterance.clone());
        if let Some(&last) = self.last_spoken.get(&key) {
            if now.saturating_sub(last) < min_interval {
                return;
            }
        }
        self.last_spoken.insert(key, now);
        self.lines.push(SpokenLine {
            tick: now,
            agent,
            utterance: utterance.clone(),
        });
    }
}

/// Sink that drops everything (NPC crews, headless runs)
pub struct Silent;

impl SpeechSink for Silent {
    fn speak(&mut self, _agent: AgentId, _utterance: &Ident, _min_interval: Tick, _now: Tick) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_drops_repeats() {
        let mut log = SpeechLog::new();
        let agent = AgentId::new();
        let line = Ident::new("cannotfinditem");

        log.speak(agent, &line, 20, 100);
        log.speak(agent, &line, 20, 110);
        log.speak(agent, &line, 20, 120);

        assert_eq!(log.lines.len(), 2);
        assert_eq!(log.lines[0].tick, 100);
        assert_eq!(log.lines[1].tick, 120);
    }

    #[test]
    fn test_distinct_utterances_not_throttled_together() {
        let mut log = SpeechLog::new();
        let agent = AgentId::new();

        log.speak(agent, &Ident::new("cannotfinditem"), 20, 100);
        log.speak(agent, &Ident::new("cannotreach"), 20, 101);

        assert_eq!(log.lines.len(), 2);
    }

    #[test]
    fn test_distinct_agents_not_throttled_together() {
        let mut log = SpeechLog::new();
        let line = Ident::new("cannotfinditem");

        log.speak(AgentId::new(), &line, 20, 100);
        log.speak(AgentId::new(), &line, 20, 101);

        assert_eq!(log.lines.len(), 2);
    }
}
