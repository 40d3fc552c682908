/*!
 * Spell-checking pipeline.
 *
 * A text goes through three stages before a word is reported:
 * - `chunkers`: split the text into candidate tokens
 * - `filters`: drop tokens that must never be flagged (placeholders, URLs, ...)
 * - `dictionary`: look the remaining tokens up in a language dictionary
 *   augmented with the project's ignore list
 *
 * # Architecture
 *
 * - `chunkers`: `Chunker` trait and the built-in chunkers
 * - `filters`: `Filter` trait and the built-in filters
 * - `dictionary`: `Lexicon` capability, Hunspell loading, `Dictionary` adapter
 * - `registry`: identifier -> factory mapping used to build a `Pipeline`
 * - `validator`: runs a `Pipeline` against one `Dictionary`
 */

pub mod chunkers;
pub mod filters;
pub mod dictionary;
pub mod registry;
pub mod validator;

pub use chunkers::{Chunker, HtmlChunker, PhraseChunker, Token, TokenKind, WordChunker};
pub use dictionary::{Dictionary, HunspellSource, Lexicon, LexiconSource, MemorySource, WordSet};
pub use filters::{EdgecaseFilter, Filter, FilterContext, IdentifierFilter, PlaceholderFilter, UrlFilter};
pub use registry::Registry;
pub use validator::{EntryValidator, Pipeline};
