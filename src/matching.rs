//! 滑动匹配牌堆
//!
//! 候选人队列加一个只进不退的游标。like 不直接记滑动，先过支付闸门，
//! 支付核验成功后由外层再调 [`SwipeDeck::record_swipe`]；pass 直接记录。
//! 撤销把上一位候选人插回游标处，一次滑动只能撤一次。

use penzi_shared::matching::{
    CandidateProfile, CanUndoResponse, LastSwipeInfo, ProfilesResponse, SwipeDecision,
    SwipeOutcome, SwipeRequest, UndoSwipeResponse,
};

use crate::adapter::CredentialStore;
use crate::api::{HttpTransport, PenziApi};
use crate::error::{PenziError, PenziResult};
use crate::log::log_warn;

// =========================================================
// 牌堆状态
// =========================================================

/// 上次拉取附带的滑动计数，空牌堆画面会展示
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeckStats {
    pub total_swiped: u32,
    pub total_unswiped: u32,
}

/// 按下 like/pass 后该做的事
#[derive(Debug, Clone, PartialEq)]
pub enum SwipeGate {
    /// like：先走 M-Pesa，支付成功后再记录
    PaymentRequired(CandidateProfile),
    /// pass：直接记录
    RecordNow(CandidateProfile),
}

#[derive(Debug, Clone, Default)]
pub struct SwipeDeck {
    profiles: Vec<CandidateProfile>,
    current_index: usize,
    stats: DeckStats,
    show_all: bool,
    can_undo: bool,
    last_swipe: Option<LastSwipeInfo>,
}

impl SwipeDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profiles(&self) -> &[CandidateProfile] {
        &self.profiles
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// 游标处的候选人；滑完了返回 None
    pub fn current(&self) -> Option<&CandidateProfile> {
        self.profiles.get(self.current_index)
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.profiles.len()
    }

    pub fn stats(&self) -> DeckStats {
        self.stats
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn can_undo(&self) -> bool {
        self.can_undo
    }

    pub fn last_swipe(&self) -> Option<&LastSwipeInfo> {
        self.last_swipe.as_ref()
    }

    /// 换一批候选人并把游标归零
    pub fn load(&mut self, response: ProfilesResponse) {
        self.profiles = response.profiles;
        self.stats = DeckStats {
            total_swiped: response.total_swiped,
            total_unswiped: response.total_unswiped,
        };
        self.current_index = 0;
    }

    /// 切换「只看新面孔 / 连已滑过的一起看」，返回新值，调用方随后重拉
    pub fn toggle_show_all(&mut self) -> bool {
        self.show_all = !self.show_all;
        self.show_all
    }

    pub fn apply_undo_status(&mut self, status: CanUndoResponse) {
        self.can_undo = status.can_undo;
        self.last_swipe = status.last_swipe;
    }

    /// 按键到动作的映射；牌堆滑完时返回 None
    pub fn gate(&self, decision: SwipeDecision) -> Option<SwipeGate> {
        let profile = self.current()?.clone();
        Some(match decision {
            SwipeDecision::Like => SwipeGate::PaymentRequired(profile),
            SwipeDecision::Pass => SwipeGate::RecordNow(profile),
        })
    }

    // 游标只进不退，且不越过牌堆末尾
    fn advance(&mut self) {
        if self.current_index < self.profiles.len() {
            self.current_index += 1;
        }
    }

    // =========================================================
    // 后端编排
    // =========================================================

    /// 按当前 show_all 模式重拉候选人
    pub async fn refresh<C, S>(&mut self, api: &PenziApi<C, S>) -> PenziResult<()>
    where
        C: HttpTransport,
        S: CredentialStore,
    {
        let response = api.swipe_profiles(self.show_all).await?;
        self.load(response);
        Ok(())
    }

    /// 撤销状态以后端为准；失败只记日志，不打断滑动
    pub async fn refresh_undo<C, S>(&mut self, api: &PenziApi<C, S>)
    where
        C: HttpTransport,
        S: CredentialStore,
    {
        match api.can_undo().await {
            Ok(status) => self.apply_undo_status(status),
            Err(err) => log_warn!("undo status check failed: {err}"),
        }
    }

    /// 真正落一笔滑动。成功才推进游标，失败原地停留可重试。
    pub async fn record_swipe<C, S>(
        &mut self,
        api: &PenziApi<C, S>,
        target: &CandidateProfile,
        decision: SwipeDecision,
    ) -> PenziResult<SwipeOutcome>
    where
        C: HttpTransport,
        S: CredentialStore,
    {
        let outcome = api
            .swipe(&SwipeRequest {
                target_user_id: target.id.clone(),
                action: decision,
            })
            .await?;
        self.advance();
        self.refresh_undo(api).await;
        Ok(outcome)
    }

    /// 撤上一笔滑动：被撤销的候选人插回游标处成为当前卡片
    pub async fn undo<C, S>(&mut self, api: &PenziApi<C, S>) -> PenziResult<UndoSwipeResponse>
    where
        C: HttpTransport,
        S: CredentialStore,
    {
        if !self.can_undo {
            return Err(PenziError::validation("Nothing to undo"));
        }
        let response = api.undo_swipe().await?;
        self.profiles
            .insert(self.current_index, response.undone_user.clone());
        self.can_undo = false;
        self.last_swipe = None;
        Ok(response)
    }
}

#[cfg(test)]
mod tests;
