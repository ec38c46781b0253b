//! Recognizers locate candidate field spans in a document.
//!
//! Every recognizer, built-in or external, sits behind the same trait and
//! is wrapped in a [`RecognizerAdapter`] that maps its labels onto the
//! closed [`Label`] set.

pub mod builtin;
pub mod command;
pub mod patterns;

pub use builtin::create_builtin;
pub use command::CommandRecognizer;

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::{ConfigError, RecognitionError};
use crate::models::config::RecognizersConfig;
use crate::models::{Label, LabeledSpan, RawSpan};

/// Trait for span recognizers.
pub trait Recognizer: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Labels this recognizer is expected to emit.
    fn labels(&self) -> &[Label];

    /// Find candidate spans in the document.
    fn recognize(&self, text: &str) -> Result<Vec<RawSpan>, RecognitionError>;
}

/// Mapping from recognizer label names to the closed label set.
#[derive(Debug, Clone)]
pub struct LabelAliases {
    aliases: BTreeMap<String, Label>,
}

impl LabelAliases {
    /// Aliases understood by every recognizer.
    pub fn new() -> Self {
        Self::empty()
            .with_alias("HORARIO_INICIO", Label::HorarioInicioAtendimento)
            .with_alias("HORARIO_FIM", Label::HorarioFimAtendimento)
    }

    pub fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    pub fn with_alias(mut self, name: impl Into<String>, label: Label) -> Self {
        self.aliases.insert(name.into(), label);
        self
    }

    pub fn extend<'a>(&mut self, aliases: impl IntoIterator<Item = (&'a String, &'a Label)>) {
        for (name, label) in aliases {
            self.aliases.insert(name.clone(), *label);
        }
    }

    /// Resolve a recognizer label; canonical names always resolve to themselves.
    pub fn resolve(&self, name: &str) -> Option<Label> {
        name.parse::<Label>()
            .ok()
            .or_else(|| self.aliases.get(name).copied())
    }
}

impl Default for LabelAliases {
    fn default() -> Self {
        Self::new()
    }
}

/// A recognizer together with its label mapping.
pub struct RecognizerAdapter {
    recognizer: Box<dyn Recognizer>,
    aliases: LabelAliases,
}

impl RecognizerAdapter {
    pub fn new(recognizer: Box<dyn Recognizer>) -> Self {
        Self {
            recognizer,
            aliases: LabelAliases::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: LabelAliases) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn name(&self) -> &str {
        self.recognizer.name()
    }

    pub fn labels(&self) -> &[Label] {
        self.recognizer.labels()
    }

    /// Run the recognizer and resolve span labels.
    ///
    /// Spans with a label outside the closed set are dropped. A span with
    /// empty text takes its text from the document slice it covers.
    pub fn recognize(&self, text: &str) -> Result<Vec<LabeledSpan>, RecognitionError> {
        let raw = self.recognizer.recognize(text)?;
        let mut spans = Vec::with_capacity(raw.len());

        for span in raw {
            let Some(label) = self.aliases.resolve(&span.label) else {
                trace!(
                    recognizer = %self.name(),
                    label = %span.label,
                    "Dropping span with unmapped label"
                );
                continue;
            };

            let surface = if span.text.is_empty() {
                text.get(span.start..span.end).unwrap_or_default().to_string()
            } else {
                span.text
            };

            spans.push(LabeledSpan {
                start: span.start,
                end: span.end,
                label,
                text: surface,
            });
        }

        Ok(spans)
    }
}

/// Ordered collection of recognizers consulted for every document.
#[derive(Default)]
pub struct RecognizerRegistry {
    adapters: Vec<RecognizerAdapter>,
}

impl RecognizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recognizer; registration order is dispatch order.
    pub fn register(&mut self, adapter: RecognizerAdapter) {
        debug!(recognizer = %adapter.name(), "Registered recognizer");
        self.adapters.push(adapter);
    }

    /// Build the registry described by the configuration.
    ///
    /// Built-in recognizers come first, then external commands.
    pub fn from_config(config: &RecognizersConfig) -> Result<Self, ConfigError> {
        if config.builtin.is_empty() && config.commands.is_empty() {
            return Err(ConfigError::NoRecognizers);
        }

        let mut shared = LabelAliases::new();
        shared.extend(&config.aliases);

        let mut registry = Self::new();
        for kind in &config.builtin {
            registry.register(
                RecognizerAdapter::new(create_builtin(*kind)).with_aliases(shared.clone()),
            );
        }

        for command in &config.commands {
            if command.name.trim().is_empty() {
                return Err(ConfigError::InvalidRecognizer {
                    name: command.program.clone(),
                    reason: "missing name".to_string(),
                });
            }
            if command.program.trim().is_empty() {
                return Err(ConfigError::InvalidRecognizer {
                    name: command.name.clone(),
                    reason: "missing program".to_string(),
                });
            }

            let mut aliases = shared.clone();
            aliases.extend(&command.aliases);
            registry.register(
                RecognizerAdapter::new(Box::new(CommandRecognizer::from_config(command)))
                    .with_aliases(aliases),
            );
        }

        Ok(registry)
    }

    pub fn adapters(&self) -> &[RecognizerAdapter] {
        &self.adapters
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
