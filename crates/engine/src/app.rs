//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{AdvancementWorkflow, CharacterRepo, ConfirmationPort};
use crate::use_cases::{self, Ruleset};

/// Main application state.
///
/// Holds the ports and every use case built over them.
pub struct App {
    pub ruleset: Arc<Ruleset>,
    pub character_repo: Arc<dyn CharacterRepo>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub sheet: use_cases::CharacterSheetUseCases,
    pub resources: use_cases::ResourceUseCases,
    pub change_class_level: use_cases::ChangeClassLevel,
    pub convert_currency: use_cases::ConvertCurrency,
}

impl App {
    pub fn new(
        ruleset: Ruleset,
        character_repo: Arc<dyn CharacterRepo>,
        advancement: Arc<dyn AdvancementWorkflow>,
        confirmation: Arc<dyn ConfirmationPort>,
    ) -> Self {
        let ruleset = Arc::new(ruleset);
        let use_cases = UseCases {
            sheet: use_cases::CharacterSheetUseCases::new(character_repo.clone(), ruleset.clone()),
            resources: use_cases::ResourceUseCases::new(character_repo.clone(), ruleset.clone()),
            change_class_level: use_cases::ChangeClassLevel::new(
                character_repo.clone(),
                advancement,
                ruleset.clone(),
            ),
            convert_currency: use_cases::ConvertCurrency::new(character_repo.clone(), confirmation),
        };
        Self {
            ruleset,
            character_repo,
            use_cases,
        }
    }
}
