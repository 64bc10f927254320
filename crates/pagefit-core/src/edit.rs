//! Edit orchestrator.
//!
//! Translates user edit commands into store mutations. The orchestrator holds
//! no state of its own: it is a dispatch table from [`EditCommand`] to a
//! [`PageStore`] setter.
//!
//! # Operation Order
//!
//! Page content is cropped, then rotated, then scaled, then translated. When a
//! batch of commands is applied with [`apply_edits`], the commands are stably
//! reordered into that order so the resulting state does not depend on the
//! order the UI happened to issue them in. Commands in the same stage keep
//! their issue order, so the last write wins.
//!
//! A `Reset` splits a batch: commands issued before the last `Reset` are
//! discarded, the page is reset, and only the commands after it are applied.
//!
//! # Rotation Commands
//!
//! [`EditCommand::Rotate`] is relative and rotates again every time it is
//! delivered. [`EditCommand::SetRotation`] is absolute and safe to retry; UI
//! paths that may dispatch twice (retries, duplicate events) should use it.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::{CropBox, Rotation};
use crate::store::PageStore;

/// A single user edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditCommand {
    /// Commit a crop. The box must already be in absolute content space; use
    /// [`crate::geometry::compose_crop`] to convert a draft drawn inside the
    /// committed window.
    Crop { crop: CropBox },
    /// Rotate relative to the current rotation (usually +90, -90 or 180).
    Rotate { degrees: i32 },
    /// Set an absolute rotation.
    SetRotation { rotation: Rotation },
    /// Set the user scale in percent.
    Scale { percent: f64 },
    /// Translate relative to the current offset.
    Translate { dx: f64, dy: f64 },
    /// Restore identity transforms. In a batch, discards every command issued
    /// before it.
    Reset,
}

/// Position of a command in the canonical operation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EditStage {
    Reset,
    Crop,
    Rotate,
    Scale,
    Translate,
}

impl EditCommand {
    pub fn stage(&self) -> EditStage {
        match self {
            EditCommand::Reset => EditStage::Reset,
            EditCommand::Crop { .. } => EditStage::Crop,
            EditCommand::Rotate { .. } | EditCommand::SetRotation { .. } => EditStage::Rotate,
            EditCommand::Scale { .. } => EditStage::Scale,
            EditCommand::Translate { .. } => EditStage::Translate,
        }
    }
}

/// Which pages a command affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditScope {
    /// Only the target page.
    #[default]
    Page,
    /// Edit the target page, then copy its transforms onto every other page.
    AllPages,
}

/// Dispatch one command to the store without any batch propagation.
fn dispatch(store: &mut PageStore, page_number: u32, command: &EditCommand) {
    trace!(page = page_number, stage = ?command.stage(), "applying edit");

    match *command {
        EditCommand::Crop { crop } => store.set_crop(page_number, crop),
        EditCommand::Rotate { degrees } => store.add_rotation(page_number, degrees),
        EditCommand::SetRotation { rotation } => store.set_rotation(page_number, rotation),
        EditCommand::Scale { percent } => store.set_scale(page_number, percent),
        EditCommand::Translate { dx, dy } => store.add_offset(page_number, dx, dy),
        EditCommand::Reset => store.reset_page(page_number),
    }
}

/// Apply one command to `page_number`.
///
/// With [`EditScope::AllPages`] the page acts as the source page: it is edited
/// first and its full transform state is then copied onto every other page.
/// Commands for unknown pages are ignored.
pub fn apply_edit(store: &mut PageStore, page_number: u32, command: &EditCommand, scope: EditScope) {
    dispatch(store, page_number, command);
    if scope == EditScope::AllPages {
        store.apply_to_all(page_number);
    }
}

/// Apply a batch of commands to `page_number` in canonical order.
pub fn apply_edits(
    store: &mut PageStore,
    page_number: u32,
    commands: &[EditCommand],
    scope: EditScope,
) {
    let pending = match commands
        .iter()
        .rposition(|command| matches!(command, EditCommand::Reset))
    {
        Some(last_reset) => {
            dispatch(store, page_number, &EditCommand::Reset);
            &commands[last_reset + 1..]
        }
        None => commands,
    };

    let mut ordered: Vec<&EditCommand> = pending.iter().collect();
    // sort_by_key is stable: same-stage commands keep their issue order.
    ordered.sort_by_key(|command| command.stage());

    for command in ordered {
        dispatch(store, page_number, command);
    }
    if scope == EditScope::AllPages {
        store.apply_to_all(page_number);
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::model::PageDimensions;
    use proptest::prelude::*;

    fn command_strategy() -> impl Strategy<Value = EditCommand> {
        prop_oneof![
            (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0).prop_map(|(x, y, w, h)| {
                EditCommand::Crop {
                    crop: CropBox::new(x, y, w, h),
                }
            }),
            prop::sample::select(vec![90, -90, 180]).prop_map(|degrees| EditCommand::Rotate { degrees }),
            prop::sample::select(Rotation::ALL.to_vec())
                .prop_map(|rotation| EditCommand::SetRotation { rotation }),
            (-100.0f64..1000.0).prop_map(|percent| EditCommand::Scale { percent }),
            (-1.0f64..1.0, -1.0f64..1.0).prop_map(|(dx, dy)| EditCommand::Translate { dx, dy }),
            Just(EditCommand::Reset),
        ]
    }

    proptest! {
        /// Property: any command sequence leaves the page in a valid state.
        #[test]
        fn prop_commands_keep_state_valid(commands in prop::collection::vec(command_strategy(), 0..20)) {
            let mut store = PageStore::new();
            store.init_page(1, PageDimensions::new(1.0, 1.0));
            for command in &commands {
                apply_edit(&mut store, 1, command, EditScope::Page);
            }

            let meta = store.get(1).unwrap();
            prop_assert!((10.0..=500.0).contains(&meta.transforms.scale));
            if let Some(crop) = meta.transforms.crop {
                prop_assert!(crop.is_within_unit_square(1e-9));
            }
            prop_assert_eq!(meta.edited, !meta.transforms.is_identity());
        }

        /// Property: a batch yields the same state whatever order it was issued in,
        /// as long as same-stage commands keep their relative order.
        #[test]
        fn prop_batch_order_independent_across_stages(
            crop in (0.0f64..0.5, 0.0f64..0.5, 0.1f64..0.5, 0.1f64..0.5),
            degrees in prop::sample::select(vec![90, -90, 180]),
            percent in 10.0f64..500.0,
            (dx, dy) in (-1.0f64..1.0, -1.0f64..1.0),
        ) {
            let forward = vec![
                EditCommand::Crop { crop: CropBox::new(crop.0, crop.1, crop.2, crop.3) },
                EditCommand::Rotate { degrees },
                EditCommand::Scale { percent },
                EditCommand::Translate { dx, dy },
            ];
            let mut backward = forward.clone();
            backward.reverse();

            let mut a = PageStore::new();
            a.init_page(1, PageDimensions::new(1.0, 1.0));
            let mut b = a.clone();
            apply_edits(&mut a, 1, &forward, EditScope::Page);
            apply_edits(&mut b, 1, &backward, EditScope::Page);

            prop_assert_eq!(a.transforms(1), b.transforms(1));
        }
    }
}
