/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: TokenGate を Router に掛ける
 * - http: request-id / body limit / timeout / TraceLayer
 */
pub mod auth;
pub mod http;
