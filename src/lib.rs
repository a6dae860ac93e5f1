//! # tac
//!
//! Lexer and reconstruction engine for aviation weather messages written in Traditional
//! Alphanumeric Codes (METAR, TAF, SIGMET, AIRMET, space weather and volcanic ash advisories).
//!
//! File Layout
//!
//!     The two directions of the conversion share one token vocabulary, so the layout is split
//!     by stage rather than by message type:
//!
//!     src/tac
//!       ├── identity       The token identity catalog
//!       ├── token          Tokens, parameter values and their errors
//!       ├── sequence       Token sequences and the sequence builder
//!       ├── lexing         Base tokenization, recognizer chains, sniffing and the lexer
//!       ├── model          The read-only structured message surface consumed by reconstruction
//!       ├── reconstruct    Reconstruction strategies, layouts and cardinality validators
//!       ├── bulletin       Bulletins and row wrapping
//!       ├── formats        Output formats for token sequences
//!       ├── hints          Conversion hints shared by both directions
//!       ├── issues         Conversion issues and results
//!       └── testing        The sample library loader
//!
//! For testing guidelines, see the [testing module](tac::testing).

pub mod tac;
