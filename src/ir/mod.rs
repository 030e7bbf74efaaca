//! Intermediate representation for vocaug.
//!
//! Boxes are held in a single coordinate system (XYXY in pixel space) and
//! carry their label with them. Construction is permissive: a box with
//! negative or swapped coordinates can be represented, and it is the bounds
//! validator that decides whether it gets written out.
//!
//! # Example
//!
//! ```
//! use vocaug::ir::{Annotation, LabeledBox};
//!
//! let annotation = Annotation::new(
//!     "image.jpg",
//!     640,
//!     480,
//!     vec![LabeledBox::from_xyxy(10.0, 20.0, 100.0, 200.0, "person")],
//! );
//! assert_eq!(annotation.boxes[0].bbox.width(), 90.0);
//! ```

mod bbox;
mod coord;
pub mod io_csv;
pub mod io_voc_xml;
mod model;
mod space;

// Re-export core types for convenient access
pub use bbox::BBoxXYXY;
pub use coord::Coord;
pub use model::{Annotation, LabeledBox};
pub use space::{Normalized, Pixel};
