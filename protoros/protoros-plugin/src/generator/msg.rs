use prost_types::FileDescriptorProto;
use protoros_core::{TranslateError, map_to_ros, ros_file_name};
use protoros_protobuf::schema_from_file_descriptor;
use protoros_rosmsg::render_ros;

use super::{GeneratedFile, Generator, GeneratorContext};
use crate::GenerateError;

/// Emits one `<pkg>/<Message>.msg` per message, nested messages included.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgGenerator;

impl Generator for MsgGenerator {
    fn generate(
        &self,
        file: &FileDescriptorProto,
        context: &GeneratorContext,
    ) -> Result<Vec<GeneratedFile>, GenerateError> {
        let schema = schema_from_file_descriptor(file).map_err(TranslateError::from)?;
        let translation = map_to_ros(&schema, &context.symbols, &context.options.mapping_policy())?;
        for loss in &translation.losses {
            log::debug!("{}: {loss}", file.name());
        }

        let package = &translation.file.package;
        translation
            .file
            .messages
            .iter()
            .map(|message| -> Result<_, GenerateError> {
                Ok(GeneratedFile {
                    name: ros_file_name(package, &message.name),
                    content: render_ros(message, package)?,
                })
            })
            .collect()
    }
}
