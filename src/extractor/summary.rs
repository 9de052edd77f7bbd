//! 抽出結果の表現と整形
//!
//! ラベル→数量の対応は挿入順を保持する。JSONにはオブジェクトとして
//! 直列化されるので、APIレスポンスの `data` キーにそのまま使える。

use serde::ser::{Serialize, SerializeMap, Serializer};

/// ラベル→数量の対応（挿入順保持）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockSummary {
    items: Vec<(String, u64)>,
}

impl StockSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未登録のラベルのみ受け付ける（先勝ち）。登録できたらtrue
    pub fn insert(&mut self, label: impl Into<String>, quantity: u64) -> bool {
        let label = label.into();
        if self.contains(&label) {
            return false;
        }
        self.items.push((label, quantity));
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.items.iter().any(|(l, _)| l == label)
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.items
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, q)| q)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.items.iter().map(|(l, q)| (l.as_str(), *q))
    }
}

impl Serialize for StockSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for (label, quantity) in &self.items {
            map.serialize_entry(label, quantity)?;
        }
        map.end()
    }
}

/// チャット返信風の在庫サマリーを整形する
pub fn render_report(summary: &StockSummary) -> String {
    if summary.is_empty() {
        return "画像から在庫情報を読み取れませんでした。😭".to_string();
    }

    let mut report = String::from("📄 **在庫サマリー** 📄\n");
    report.push_str(&"-".repeat(20));
    report.push('\n');
    for (label, quantity) in summary.iter() {
        report.push_str(&format!("**{}**: {}\n", label, quantity));
    }
    report.push_str(&"-".repeat(20));
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_first_wins() {
        let mut summary = StockSummary::new();
        assert!(summary.insert("milk", 12));
        assert!(!summary.insert("milk", 99));
        assert_eq!(summary.get("milk"), Some(12));
        assert_eq!(summary.len(), 1);
    }

    #[test]
    fn test_serializes_as_object_in_insertion_order() {
        let mut summary = StockSummary::new();
        summary.insert("milk", 12);
        summary.insert("egg", 3);
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"milk":12,"egg":3}"#);
    }

    #[test]
    fn test_render_report() {
        let mut summary = StockSummary::new();
        summary.insert("milk", 12);
        let report = render_report(&summary);
        assert!(report.contains("在庫サマリー"));
        assert!(report.contains("**milk**: 12"));
    }

    #[test]
    fn test_render_report_empty() {
        let report = render_report(&StockSummary::new());
        assert!(report.contains("読み取れませんでした"));
    }
}
