//! The "Create Container" form: field state, editing and validation.

use vdesk_common::error::{Result, VdeskError};
use vdesk_common::types::{ContainerName, CreateRequest};

/// An input field of the create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Six-digit user name.
    Name,
    /// Image reference.
    Image,
    /// CPU limit.
    Cpus,
    /// Memory limit.
    Memory,
    /// Shared memory size.
    ShmSize,
    /// Comma-separated GPU indices.
    Gpus,
    /// Swap size.
    Swap,
    /// Root password (masked).
    RootPassword,
    /// Free-form note.
    Comment,
}

impl Field {
    /// Every field, in display order.
    pub const ALL: [Self; 9] = [
        Self::Name,
        Self::Image,
        Self::Cpus,
        Self::Memory,
        Self::ShmSize,
        Self::Gpus,
        Self::Swap,
        Self::RootPassword,
        Self::Comment,
    ];

    /// Label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Image => "Image",
            Self::Cpus => "CPUs",
            Self::Memory => "Memory",
            Self::ShmSize => "Shm size",
            Self::Gpus => "GPUs",
            Self::Swap => "Swap",
            Self::RootPassword => "Root password",
            Self::Comment => "Comment",
        }
    }

    /// Whether the value is hidden when rendered.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::RootPassword)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

const FIELD_COUNT: usize = Field::ALL.len();

/// Editable state of the create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    values: [String; FIELD_COUNT],
    focused: usize,
}

impl CreateForm {
    /// Current value of `field`.
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Replaces the value of `field`.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Field that receives typed characters.
    #[must_use]
    pub const fn focused(&self) -> Field {
        Field::ALL[self.focused]
    }

    /// Moves focus to the next field, wrapping around.
    pub const fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % FIELD_COUNT;
    }

    /// Moves focus to the previous field, wrapping around.
    pub const fn focus_prev(&mut self) {
        self.focused = (self.focused + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    /// Appends a character to the focused field.
    pub fn push_char(&mut self, c: char) {
        self.values[self.focused].push(c);
    }

    /// Deletes the last character of the focused field.
    pub fn pop_char(&mut self) {
        let _ = self.values[self.focused].pop();
    }

    /// Resets every field and the focus.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Text shown for `field`, masking secrets.
    #[must_use]
    pub fn display_value(&self, field: Field) -> String {
        let value = self.value(field);
        if field.is_secret() {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        }
    }

    /// Validates the form into a create request.
    ///
    /// # Errors
    ///
    /// Returns [`VdeskError::InvalidInput`] naming the first bad field.
    pub fn to_request(&self) -> Result<CreateRequest> {
        let name = ContainerName::new(self.value(Field::Name).trim())?;
        let cpus = self
            .value(Field::Cpus)
            .trim()
            .parse::<u32>()
            .map_err(|_| VdeskError::invalid("cpus", "must be a whole number"))?;
        let gpus = parse_gpus(self.value(Field::Gpus))?;
        let request = CreateRequest {
            name,
            image: self.value(Field::Image).trim().to_string(),
            cpus,
            memory: self.value(Field::Memory).trim().to_string(),
            shm_size: optional(self.value(Field::ShmSize)),
            gpus,
            swap: optional(self.value(Field::Swap)),
            root_password: optional(self.value(Field::RootPassword)),
            comment: optional(self.value(Field::Comment)),
        };
        request.validate()?;
        Ok(request)
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parses `0, 2,3` into GPU indices; blank means none.
///
/// # Errors
///
/// Returns [`VdeskError::InvalidInput`] for a non-numeric entry.
pub fn parse_gpus(input: &str) -> Result<Vec<u32>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| VdeskError::invalid("gpus", format!("\"{s}\" is not a GPU index")))
        })
        .collect()
}
