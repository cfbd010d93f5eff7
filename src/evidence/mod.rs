//! Evidence highlighting for claim analysis reports
//!
//! Every evidence report names the sentences of its abstract that drove the
//! verdict. This module finds those sentences in the abstract and renders the
//! abstract as inline HTML with the sentences highlighted.
//!
//! # Example
//!
//! ```
//! use sciclaims::evidence::{highlight, spans};
//!
//! let abstract_text = "Studies show Aspirin reduces inflammation. More research needed.";
//! let (starts, ends) = spans::locate(&["Aspirin reduces inflammation."], abstract_text);
//! assert_eq!((starts.as_slice(), ends.as_slice()), (&[13][..], &[42][..]));
//!
//! let html = highlight::render(&starts, &ends, abstract_text, "green");
//! assert!(html.contains("background-color:green"));
//! ```

pub mod highlight;
pub mod spans;

pub use highlight::{escape_html, render, render_escaped};
pub use spans::{find_sentence, locate, locate_spans, Span};
