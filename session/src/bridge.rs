use rand::Rng;
use word_graph_core::tokenize;

use crate::error::{Result, SessionError};
use crate::state::Session;
use crate::util::normalize_word;

impl Session {
    /// Bridge words between two user-typed words, sorted.
    ///
    /// An unknown word is not an error: it simply has no bridges.
    pub fn bridge_words(&self, w1: &str, w2: &str) -> Result<Vec<String>> {
        let (w1, w2) = (normalize_word(w1)?, normalize_word(w2)?);
        let state = self.snapshot()?;
        Ok(word_graph_core::bridge_words(&state.graph, &w1, &w2)
            .into_iter()
            .collect())
    }

    /// Tokenize `text` and insert a random bridge word between each
    /// adjacent pair that has one. Returns the words joined by spaces.
    pub fn bridged_sentence<R: Rng>(&self, text: &str, rng: &mut R) -> Result<String> {
        let tokens = tokenize(text);
        if tokens.len() < 2 {
            return Err(SessionError::SentenceTooShort);
        }
        let state = self.snapshot()?;
        let words = word_graph_core::bridged_sentence(&state.graph, &tokens, rng);
        tracing::debug!(input = tokens.len(), output = words.len(), "bridged sentence");
        Ok(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fox_session() -> Session {
        let session = Session::default();
        session
            .load_text("The quick brown fox jumps over the lazy dog")
            .unwrap();
        session
    }

    #[test]
    fn test_bridge_words() {
        let session = fox_session();
        assert_eq!(session.bridge_words(" Quick", "FOX ").unwrap(), vec!["brown"]);
        assert!(session.bridge_words("lazy", "dog").unwrap().is_empty());
        assert!(session.bridge_words("quick", "banana").unwrap().is_empty());
    }

    #[test]
    fn test_bridge_words_sorted() {
        let session = Session::default();
        session.load_text("a z b a y b a x b").unwrap();
        assert_eq!(session.bridge_words("a", "b").unwrap(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_bridge_words_errors() {
        let session = Session::default();
        assert!(matches!(session.bridge_words("a", "b"), Err(SessionError::NotLoaded)));

        let session = fox_session();
        assert!(matches!(session.bridge_words("", "fox"), Err(SessionError::EmptyWord)));
    }

    #[test]
    fn test_bridged_sentence() {
        let session = fox_session();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let out = session.bridged_sentence("Quick fox, lazy dog!", &mut rng).unwrap();
        assert_eq!(out, "quick brown fox lazy dog");
    }

    #[test]
    fn test_bridged_sentence_too_short() {
        let session = fox_session();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        assert!(matches!(
            session.bridged_sentence("fox", &mut rng),
            Err(SessionError::SentenceTooShort)
        ));
        assert!(matches!(
            session.bridged_sentence("42 !!", &mut rng),
            Err(SessionError::SentenceTooShort)
        ));
    }
}
