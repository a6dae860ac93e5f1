//! Reconstructor context
//!
//! Strategies are stateless; everything they need for one call travels in the context:
//! the message, the conversion hints and positional parameters such as the index of the
//! repeated analysis being written.

use crate::tac::hints::ConversionHints;
use crate::tac::model::WeatherMessage;
use std::collections::BTreeMap;

/// Parameter holding the index of the analysis being written.
pub const ANALYSIS_INDEX: &str = "analysis";

#[derive(Clone)]
pub struct ReconstructorContext<'a> {
    message: &'a dyn WeatherMessage,
    hints: &'a ConversionHints,
    parameters: BTreeMap<&'static str, usize>,
}

impl<'a> ReconstructorContext<'a> {
    pub fn new(message: &'a dyn WeatherMessage, hints: &'a ConversionHints) -> Self {
        Self {
            message,
            hints,
            parameters: BTreeMap::new(),
        }
    }

    pub fn message(&self) -> &'a dyn WeatherMessage {
        self.message
    }

    pub fn hints(&self) -> &'a ConversionHints {
        self.hints
    }

    pub fn parameter(&self, name: &str) -> Option<usize> {
        self.parameters.get(name).copied()
    }

    /// A copy of this context with `name` set to `value`. The original is unchanged.
    pub fn with_parameter(&self, name: &'static str, value: usize) -> Self {
        let mut derived = self.clone();
        derived.parameters.insert(name, value);
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::model::MessageType;

    struct Sigmet;

    impl WeatherMessage for Sigmet {
        fn message_type(&self) -> MessageType {
            MessageType::Sigmet
        }
    }

    #[test]
    fn test_with_parameter_derives_a_copy() {
        let hints = ConversionHints::default();
        let parent = ReconstructorContext::new(&Sigmet, &hints);
        let child = parent.with_parameter(ANALYSIS_INDEX, 2);
        let grandchild = child.with_parameter(ANALYSIS_INDEX, 3);

        assert_eq!(parent.parameter(ANALYSIS_INDEX), None);
        assert_eq!(child.parameter(ANALYSIS_INDEX), Some(2));
        assert_eq!(grandchild.parameter(ANALYSIS_INDEX), Some(3));
        assert_eq!(child.message().message_type(), MessageType::Sigmet);
    }
}
