use serde::Serialize;

use crate::model::Post;
use crate::ui::mvi::Effect;

/// One-shot instructions for the home screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "post", rename_all = "snake_case")]
pub enum HomeEffect {
    OpenPost(Post),
    NavigateToAddScreen,
}

impl Effect for HomeEffect {}
