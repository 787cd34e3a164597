/**
 * Media Module - Normalized catalog records
 *
 * Handles:
 * - Content type and sort key vocabulary
 * - Result cards and detail records handed to the renderer
 */

pub mod types;

pub use types::*;
