//! Bearer token check → AuthData を extensions に入れる
//!
//! - ヘッダ抽出 / 検証 / ログは `TokenGate::handle` が担当する
//! - ここは Decision を HTTP に写すだけ:
//!   - `Reject` → status (+ 任意の JSON body) を返し、後段の handler は走らない
//!   - `Admit` → `AuthData` を request extensions に格納して `next` を呼ぶ

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::gate::{AuthData, Decision, TokenGate};

/// 指定した Router 全体に gate を掛ける。
///
/// 例：
/// ```ignore
/// let secret = Router::new().route("/secret", get(secret));
/// let secret = middleware::auth::access::apply(secret, state.gate.clone());
/// ```
pub fn apply<S>(router: Router<S>, gate: TokenGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, access_middleware))
}

async fn access_middleware(
    State(gate): State<TokenGate>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // 上流で別の gate を通っていれば、その結果に追記する
    let mut auth = req.extensions_mut().remove::<AuthData>().unwrap_or_default();

    match gate.handle(req.headers(), &mut auth) {
        Decision::Admit => {
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Decision::Reject(rejection) => rejection.into_response(),
    }
}
