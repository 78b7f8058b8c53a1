//! Built-in language plugins.

mod dart;
mod gdscript;
mod kotlin;
mod swift;
mod typescript;

pub use dart::DartPlugin;
pub use gdscript::GDScriptPlugin;
pub use kotlin::KotlinPlugin;
pub use swift::SwiftPlugin;
pub use typescript::TypeScriptPlugin;

use crate::plugin::{Language, LanguagePlugin};

static KOTLIN: KotlinPlugin = KotlinPlugin;
static SWIFT: SwiftPlugin = SwiftPlugin;
static DART: DartPlugin = DartPlugin;
static TYPESCRIPT: TypeScriptPlugin = TypeScriptPlugin;
static GDSCRIPT: GDScriptPlugin = GDScriptPlugin;

/// The plugin rendering `language`.
#[must_use]
pub fn plugin_for(language: Language) -> &'static dyn LanguagePlugin {
    match language {
        Language::Kotlin => &KOTLIN,
        Language::Swift => &SWIFT,
        Language::Dart => &DART,
        Language::TypeScript => &TYPESCRIPT,
        Language::GDScript => &GDSCRIPT,
    }
}
