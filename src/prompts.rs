//! Prompt templates for the provider calls.
//!
//! All prompt text is assembled here, through [`PromptBuilder`], so the
//! exact payloads are testable without a network connection. The creative
//! output is always requested in Spanish regardless of the UI language —
//! that is the board's voice.

/// Hard cap for image-generation prompts; the image endpoint rejects
/// anything longer.
pub const IMAGE_PROMPT_LIMIT: usize = 1000;

/// Builds the final user prompt from structured fields instead of ad-hoc
/// string interpolation at the call sites.
pub struct PromptBuilder {
    instruction: String,
    language: String,
    description: Option<String>,
}

impl PromptBuilder {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            language: "español".to_string(),
            description: None,
        }
    }

    /// Natural language the model should answer in.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Prior sketch description to ground the generation on.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.trim().to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut prompt = self.instruction.trim().to_string();
        if let Some(desc) = &self.description {
            prompt.push_str("\n\nDescripción del boceto:\n");
            prompt.push_str(desc);
        }
        prompt.push_str(&format!("\n\nResponde en {}.", self.language));
        prompt
    }
}

/// Vision instruction sent together with the encoded sketch.
pub fn describe() -> String {
    PromptBuilder::new(
        "Eres un asistente creativo. Observa este boceto y describe con \
         detalle lo que aparece: formas, objetos, escena, colores y estilo \
         del trazo. Sé concreto y evocador, en un solo párrafo.",
    )
    .build()
}

/// Creative-pack instruction, grounded on a prior description.
pub fn creative_pack(description: &str) -> String {
    PromptBuilder::new(
        "Eres un asistente creativo. A partir de la descripción de un dibujo, \
         devuelve un Pack Creativo con estas secciones etiquetadas:\n\
         - ✨ TITULO: un título llamativo para el dibujo\n\
         - 📜 VERSO: un poema corto de cuatro líneas\n\
         - 🎨 PALETA: 3 colores que combinen bien, en formato hexadecimal #RRGGBB\n\
         - 📝 ACTIVIDAD: una mini actividad creativa que un niño podría hacer\n\
         - 🌟 PROMPT: un prompt refinado para inspirar IA generativa\n\
         - 😀 EMOJIS: algunos emojis relacionados",
    )
    .description(description)
    .build()
}

/// Children's-story instruction, grounded on a prior description.
pub fn story(description: &str) -> String {
    PromptBuilder::new(
        "Eres un cuentacuentos. Escribe un cuento infantil corto, de unos \
         tres párrafos, con un protagonista inspirado en el dibujo descrito. \
         Tono cálido, final feliz.",
    )
    .description(description)
    .build()
}

/// Text-to-image prompt derived from the description, truncated to the
/// endpoint's limit on a char boundary.
pub fn enhance(description: &str) -> String {
    let mut prompt = format!(
        "Ilustración digital detallada y colorida basada en este boceto: {}",
        description.trim()
    );
    if prompt.len() > IMAGE_PROMPT_LIMIT {
        let mut cut = IMAGE_PROMPT_LIMIT;
        while !prompt.is_char_boundary(cut) {
            cut -= 1;
        }
        prompt.truncate(cut);
    }
    prompt
}
