/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (TokenGate は内部 Arc なので cheap)
 */
use crate::gate::TokenGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: TokenGate,
}

impl AppState {
    pub fn new(gate: TokenGate) -> Self {
        Self { gate }
    }
}
