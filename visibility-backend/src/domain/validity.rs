// visibility-backend/src/domain/validity.rs

use chrono::NaiveDate;

/// 有効期間を持つ可視性ルール（代理・エリア権限・個別権限）の共通判定
///
/// `is_active = true` かつ（終了日なし、または終了日 >= 今日）のとき有効。
/// 開始日は記録のみで判定には使わない。
pub trait ValidityWindow {
    fn active_flag(&self) -> bool;

    fn end_date(&self) -> Option<NaiveDate>;

    fn is_in_force(&self, today: NaiveDate) -> bool {
        if !self.active_flag() {
            return false;
        }
        match self.end_date() {
            Some(end) => end >= today,
            None => true,
        }
    }
}
