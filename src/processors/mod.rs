pub mod template;

use serde::{Deserialize, Serialize};

use crate::processors::template::TemplateProcessing;
use crate::{Encoding, PostProcessor};

/// Wrapper for known PostProcessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PostProcessorWrapper {
    TemplateProcessing(TemplateProcessing),
}

impl PostProcessor for PostProcessorWrapper {
    fn process_encodings(&self, encodings: Vec<Encoding>) -> crate::Result<Vec<Encoding>> {
        match self {
            PostProcessorWrapper::TemplateProcessing(tp) => tp.process_encodings(encodings),
        }
    }
}

impl_enum_from!(TemplateProcessing, PostProcessorWrapper, TemplateProcessing);
