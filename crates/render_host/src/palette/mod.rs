//! Material palette system
//!
//! Named PBR material presets for the hosted renderer. Presets are declared
//! in a small XML document (`materials.xml`), parsed once at startup into an
//! in-memory store, and never mutated afterwards. Selecting a preset copies
//! its fields into the session's one mutable "current material".
//!
//! The document format:
//!
//! ```xml
//! <materials>
//!     <material name="Silver">
//!         <albedo>0.97, 0.96, 0.91</albedo>
//!         <metallic>1.0</metallic>
//!         <roughness>0.25</roughness>
//!         <clearCoat>0.0</clearCoat>
//!     </material>
//! </materials>
//! ```

pub mod material;
pub mod parser;
pub mod xml;

pub use material::{Material, MaterialPalette};
pub use parser::{PaletteError, PaletteParser};
pub use xml::{Attribute, MarkupError, XmlEvent, XmlReader};
