/*
 * Responsibility
 * - 外部 capability (token 検証) の境界
 */
pub mod auth;
