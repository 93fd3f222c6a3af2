//! # 자동 응답(Canned Responder) 서비스
//!
//! 고객 메시지에 포함된 키워드를 보고 미리 준비된 답변 중 하나를 고릅니다.
//! 자연어 이해는 하지 않습니다. 키워드 표와 난수 선택이 전부입니다.
//!
//! ## 선택 규칙
//! 1. 메시지를 소문자로 바꿉니다.
//! 2. `KEYWORD_REPLIES`를 **위에서부터** 검사하여, 처음으로 포함된 키워드의 답변 목록을 씁니다.
//!    (예: "problema na entrega"는 "entrega"가 "problema"보다 앞에 있으므로 배송 답변)
//! 3. 어떤 키워드도 없으면 `DEFAULT_REPLIES`를 씁니다.
//! 4. 고른 목록에서 균등 확률로 하나를 뽑습니다.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// 키워드 → 답변 후보 표. 순서가 우선순위입니다.
pub const KEYWORD_REPLIES: &[(&str, &[&str])] = &[
    (
        "rastrear",
        &[
            "Para rastrear sua encomenda, preciso do código de rastreamento. Você pode me informar o código que começa com JT?",
            "Claro! Vou ajudar você a rastrear sua encomenda. Por favor, me informe o código de rastreamento.",
        ],
    ),
    (
        "entrega",
        &[
            "Entendo sua preocupação com a entrega. Pode me contar mais detalhes sobre o problema que está enfrentando?",
            "Vou verificar o que aconteceu com sua entrega. Você pode me informar o código de rastreamento e seu endereço?",
        ],
    ),
    (
        "endereço",
        &[
            "Para alterar o endereço de entrega, preciso verificar se ainda é possível fazer essa alteração. Me informe o código de rastreamento, por favor.",
            "Vou ajudar você a alterar o endereço. Primeiro, preciso do código de rastreamento da sua encomenda.",
        ],
    ),
    (
        "supervisor",
        &[
            "Vou transferir você para um supervisor agora mesmo. Por favor, aguarde um momento.",
            "Entendo que precisa falar com um supervisor. Vou fazer a transferência imediatamente.",
        ],
    ),
    (
        "problema",
        &[
            "Sinto muito pelo inconveniente. Pode me explicar qual problema está enfrentando para que eu possa ajudar?",
            "Vou resolver isso para você! Me conte mais detalhes sobre o problema.",
        ],
    ),
];

/// 키워드가 하나도 없을 때의 답변 후보
pub const DEFAULT_REPLIES: &[&str] = &[
    "Entendi. Vou verificar essa informação para você. Um momento, por favor.",
    "Obrigado pela informação. Deixe-me consultar nosso sistema.",
    "Perfeito! Vou processar sua solicitação agora.",
    "Compreendo sua situação. Vou fazer o possível para resolver isso rapidamente.",
    "Essa é uma ótima pergunta! Vou buscar a resposta mais precisa para você.",
];

/// 메시지에 해당하는 답변 후보 목록을 반환합니다 (난수 없음).
pub fn candidates_for(text: &str) -> &'static [&'static str] {
    let lowered = text.to_lowercase();
    KEYWORD_REPLIES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, replies)| *replies)
        .unwrap_or(DEFAULT_REPLIES)
}

/// 주어진 난수 생성기로 답변 하나를 고릅니다.
///
/// 후보 목록이 비어 있으면 기본 답변 첫 번째를 반환합니다.
pub fn respond_with<R: Rng + ?Sized>(text: &str, rng: &mut R) -> &'static str {
    candidates_for(text)
        .choose(rng)
        .copied()
        .unwrap_or(DEFAULT_REPLIES[0])
}

/// 난수 생성기를 소유한 자동 응답기
///
/// 여러 요청이 동시에 호출할 수 있도록 `StdRng`를 `Mutex`로 감쌉니다.
/// 잠금은 답변 하나를 고르는 동안만 유지합니다.
pub struct CannedResponder {
    rng: Mutex<StdRng>,
}

impl CannedResponder {
    /// OS 난수로 초기화합니다 (운영 환경).
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// 고정 시드로 초기화합니다. 같은 시드와 같은 입력 순서면 같은 답변이 나옵니다.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn respond(&self, text: &str) -> &'static str {
        // 다른 스레드가 잠금 중 패닉해도 난수 상태는 여전히 유효하므로 그대로 사용합니다.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        respond_with(text, &mut *rng)
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new()
    }
}
