//! Macros for ergonomic state and action definitions.

/// Generate the `State` trait implementation for an enum.
///
/// Variants may be unit, tuple or struct variants; only their names are
/// listed.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// pub enum UploadState {
///     Idle,
///     Uploading { percent: u8 },
///     Done,
///     Failed(String),
/// }
///
/// reflow::impl_state! {
///     UploadState { Idle, Uploading, Done, Failed }
///     final: [Done, Failed]
///     error: [Failed]
/// }
///
/// use reflow::core::State;
/// assert_eq!(UploadState::Uploading { percent: 3 }.name(), "Uploading");
/// assert!(UploadState::Failed("disk full".into()).is_error());
/// ```
#[macro_export]
macro_rules! impl_state {
    (
        $name:ident { $($variant:ident),* $(,)? }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        impl $crate::core::State for $name {
            fn name(&self) -> &'static str {
                match *self {
                    $(Self::$variant { .. } => stringify!($variant)),*
                }
            }

            fn variants() -> &'static [&'static str] {
                &[$(stringify!($variant)),*]
            }

            #[allow(unreachable_patterns)]
            fn is_final(&self) -> bool {
                match *self {
                    $($(Self::$final { .. } => true,)*)?
                    _ => false,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_error(&self) -> bool {
                match *self {
                    $($(Self::$error { .. } => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Generate the `Action` trait implementation for an enum.
///
/// # Example
///
/// ```
/// #[derive(Clone, Debug)]
/// pub enum UploadAction {
///     Start { path: String },
///     Cancel,
/// }
///
/// reflow::impl_action!(UploadAction { Start, Cancel });
///
/// use reflow::core::Action;
/// assert_eq!(UploadAction::Cancel.name(), "Cancel");
/// assert_eq!(UploadAction::variants(), &["Start", "Cancel"]);
/// ```
#[macro_export]
macro_rules! impl_action {
    ($name:ident { $($variant:ident),* $(,)? }) => {
        impl $crate::core::Action for $name {
            fn name(&self) -> &'static str {
                match *self {
                    $(Self::$variant { .. } => stringify!($variant)),*
                }
            }

            fn variants() -> &'static [&'static str] {
                &[$(stringify!($variant)),*]
            }
        }
    };
}
