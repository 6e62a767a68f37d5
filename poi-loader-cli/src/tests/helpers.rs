//! Test helpers for composing layered `loadpoi` configuration.

use super::*;
use crate::loadpoi::LoadConfig;

#[derive(Debug, Clone, Default)]
pub(super) struct LayerOverrides {
    pub(super) batch_size: Option<usize>,
    pub(super) database: Option<camino::Utf8PathBuf>,
}

/// Apply environment and file layers beneath the CLI values, mirroring the
/// precedence of `load_and_merge` without touching the process environment.
pub(super) fn merge_layers(
    mut cli_args: LoadArgs,
    file_layer: Option<LayerOverrides>,
    env_layer: Option<LayerOverrides>,
) -> Result<LoadConfig, CliError> {
    merge_field(
        &mut cli_args.batch_size,
        extract_field(env_layer.as_ref(), |layer| &layer.batch_size),
        extract_field(file_layer.as_ref(), |layer| &layer.batch_size),
    );
    merge_field(
        &mut cli_args.database,
        extract_field(env_layer.as_ref(), |layer| &layer.database),
        extract_field(file_layer.as_ref(), |layer| &layer.database),
    );
    LoadConfig::try_from(cli_args)
}

fn merge_field<T: Clone>(target: &mut Option<T>, env_value: Option<T>, file_value: Option<T>) {
    if target.is_none()
        && let Some(value) = env_value.or(file_value)
    {
        *target = Some(value);
    }
}

fn extract_field<T: Clone>(
    layer: Option<&LayerOverrides>,
    accessor: fn(&LayerOverrides) -> &Option<T>,
) -> Option<T> {
    layer.and_then(|entry| accessor(entry).clone())
}
