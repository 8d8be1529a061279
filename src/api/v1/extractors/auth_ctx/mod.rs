/*
 * Responsibility
 * - Handler から見える「認証済み claims」の extractor
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 */
mod core;

pub use self::core::AuthClaims;
