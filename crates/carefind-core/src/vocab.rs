//! Controlled vocabularies offered as filter choices.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOption {
    pub key: &'static str,
    pub label: &'static str,
}

pub const SERVICE_OPTIONS: &[ServiceOption] = &[
    ServiceOption { key: "home_care", label: "訪問介護・ヘルパー" },
    ServiceOption { key: "home_nursing", label: "訪問看護" },
    ServiceOption { key: "home_rehab", label: "訪問リハビリ" },
    ServiceOption { key: "day_service", label: "デイサービス・通所介護" },
    ServiceOption { key: "day_rehab", label: "デイケア・通所リハビリ" },
    ServiceOption { key: "short_stay", label: "ショートステイ・短期入所" },
    ServiceOption { key: "group_home", label: "グループホーム・認知症対応型" },
    ServiceOption { key: "nursing_home", label: "特定施設入居者生活介護" },
    ServiceOption { key: "senior_housing", label: "サービス付き高齢者向け住宅" },
    ServiceOption { key: "disability_daycare", label: "障害児通所支援" },
    ServiceOption { key: "after_school", label: "放課後等デイサービス" },
    ServiceOption { key: "child_development", label: "児童発達支援" },
    ServiceOption { key: "employment_support_a", label: "就労継続支援A型" },
    ServiceOption { key: "employment_support_b", label: "就労継続支援B型" },
    ServiceOption { key: "consultation_support", label: "相談支援" },
    ServiceOption { key: "care_manager", label: "介護支援専門員・ケアマネ" },
];

/// The 47 prefectures in JIS code order.
pub const PREFECTURES: [&str; 47] = [
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県",
    "茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県",
    "新潟県", "富山県", "石川県", "福井県", "山梨県", "長野県", "岐阜県",
    "静岡県", "愛知県", "三重県", "滋賀県", "京都府", "大阪府", "兵庫県",
    "奈良県", "和歌山県", "鳥取県", "島根県", "岡山県", "広島県", "山口県",
    "徳島県", "香川県", "愛媛県", "高知県", "福岡県", "佐賀県", "長崎県",
    "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

/// Looks up the display label for a service key.
#[must_use]
pub fn service_label(key: &str) -> Option<&'static str> {
    SERVICE_OPTIONS
        .iter()
        .find(|option| option.key == key)
        .map(|option| option.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_keys_are_unique() {
        let mut keys: Vec<_> = SERVICE_OPTIONS.iter().map(|o| o.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), SERVICE_OPTIONS.len());
    }

    #[test]
    fn service_label_resolves_known_key() {
        assert_eq!(service_label("home_nursing"), Some("訪問看護"));
        assert_eq!(service_label("unknown"), None);
    }

    #[test]
    fn prefectures_include_tokyo_and_okinawa() {
        assert!(PREFECTURES.contains(&"東京都"));
        assert_eq!(PREFECTURES[46], "沖縄県");
    }
}
