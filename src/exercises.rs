//! Exercise catalog - static table of warmup, main and cooldown movements

use serde::{Deserialize, Serialize};

/// Bump whenever entries are added, removed or retagged.
pub const CATALOG_VERSION: u32 = 1;

/// Training targets a session can be built around
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyPart {
    Legs,       // 下肢
    Chest,      // 胸部
    Back,       // 背部
    Shoulders,  // 肩膀
    Core,       // 核心
    Functional, // 下肢剛性/動力鍊
    /// Catch-all tag, only used by cooldown stretches
    #[serde(rename = "ALL")]
    General,
}

impl BodyPart {
    pub fn label(&self) -> &'static str {
        match self {
            BodyPart::Legs => "下肢",
            BodyPart::Chest => "胸部",
            BodyPart::Back => "背部",
            BodyPart::Shoulders => "肩膀",
            BodyPart::Core => "核心",
            BodyPart::Functional => "下肢剛性/動力鍊",
            BodyPart::General => "全身",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BodyPart::Legs => "🦿",
            BodyPart::Chest => "🦍",
            BodyPart::Back => "🦅",
            BodyPart::Shoulders => "🦾",
            BodyPart::Core => "🏋️",
            BodyPart::Functional => "👟",
            BodyPart::General => "🧘",
        }
    }

    /// Parts a user can pick on the setup screen, in display order
    pub fn selectable() -> &'static [BodyPart] {
        &[
            BodyPart::Legs,
            BodyPart::Chest,
            BodyPart::Back,
            BodyPart::Shoulders,
            BodyPart::Core,
            BodyPart::Functional,
        ]
    }

    /// Parse a CLI-style name ("legs", "CHEST", "all")
    pub fn parse(s: &str) -> Option<BodyPart> {
        match s.trim().to_lowercase().as_str() {
            "legs" => Some(BodyPart::Legs),
            "chest" => Some(BodyPart::Chest),
            "back" => Some(BodyPart::Back),
            "shoulders" => Some(BodyPart::Shoulders),
            "core" => Some(BodyPart::Core),
            "functional" => Some(BodyPart::Functional),
            "general" | "all" => Some(BodyPart::General),
            _ => None,
        }
    }
}

/// Session phase an exercise belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Warmup,
    Main,
    Cooldown,
}

impl Category {
    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Warmup => "🔥",
            Category::Main => "💪",
            Category::Cooldown => "🧘",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Warmup => "熱身",
            Category::Main => "主訓練",
            Category::Cooldown => "收操",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exercise {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub body_parts: &'static [BodyPart],
    /// Free-text target, e.g. "10 下" or "45 秒". Drives the timer mode.
    pub prescription: Option<&'static str>,
    pub emoji: &'static str,
}

impl Exercise {
    pub fn targets(&self, part: BodyPart) -> bool {
        self.body_parts.contains(&part)
    }

    pub fn targets_any(&self, parts: &[BodyPart]) -> bool {
        self.body_parts.iter().any(|p| parts.contains(p))
    }
}

pub const EXERCISE_DB: &[Exercise] = &[
    // 熱身 (Warmup)
    Exercise {
        id: "w1",
        name: "連續踝關節跳 (Pogo Jumps)",
        category: Category::Warmup,
        body_parts: &[BodyPart::Legs, BodyPart::Functional],
        prescription: None,
        emoji: "🔥",
    },
    Exercise {
        id: "w2",
        name: "高抬腿跑",
        category: Category::Warmup,
        body_parts: &[BodyPart::Legs, BodyPart::Functional],
        prescription: None,
        emoji: "🏃",
    },
    Exercise {
        id: "w3",
        name: "藥球繞頭 + 肩部環繞",
        category: Category::Warmup,
        body_parts: &[BodyPart::Shoulders, BodyPart::Core],
        prescription: None,
        emoji: "🏐",
    },
    Exercise {
        id: "w4",
        name: "毛毛蟲爬行",
        category: Category::Warmup,
        body_parts: &[BodyPart::Core, BodyPart::Functional],
        prescription: None,
        emoji: "🐛",
    },
    Exercise {
        id: "w5",
        name: "世界最偉大伸展",
        category: Category::Warmup,
        body_parts: &[BodyPart::Legs, BodyPart::Back],
        prescription: None,
        emoji: "🌍",
    },
    Exercise {
        id: "w6",
        name: "彈力帶肩內外旋",
        category: Category::Warmup,
        body_parts: &[BodyPart::Shoulders],
        prescription: None,
        emoji: "🎗️",
    },
    Exercise {
        id: "w7",
        name: "平板支撐轉體",
        category: Category::Warmup,
        body_parts: &[BodyPart::Core, BodyPart::Back],
        prescription: None,
        emoji: "🧱",
    },

    // 下肢肌力 (Legs)
    Exercise {
        id: "l1",
        name: "槓鈴/啞鈴 深蹲",
        category: Category::Main,
        body_parts: &[BodyPart::Legs],
        prescription: Some("8-10 下"),
        emoji: "🏋️",
    },
    Exercise {
        id: "l2",
        name: "保加利亞分腿蹲",
        category: Category::Main,
        body_parts: &[BodyPart::Legs],
        prescription: Some("單腳 8 下"),
        emoji: "🦵",
    },
    Exercise {
        id: "l3",
        name: "羅馬尼亞硬舉 (RDL)",
        category: Category::Main,
        body_parts: &[BodyPart::Legs, BodyPart::Back],
        prescription: Some("10 下"),
        emoji: "📉",
    },
    Exercise {
        id: "l4",
        name: "負重弓箭步行走",
        category: Category::Main,
        body_parts: &[BodyPart::Legs],
        prescription: Some("20 步"),
        emoji: "🚶",
    },
    Exercise {
        id: "l5",
        name: "啞鈴登階 (Step-ups)",
        category: Category::Main,
        body_parts: &[BodyPart::Legs],
        prescription: Some("單腳 10 下"),
        emoji: "🪜",
    },
    Exercise {
        id: "l6",
        name: "負重深蹲跳",
        category: Category::Main,
        body_parts: &[BodyPart::Legs, BodyPart::Functional],
        prescription: Some("6 下"),
        emoji: "🐇",
    },
    Exercise {
        id: "l7",
        name: "槓鈴/啞鈴 臀推",
        category: Category::Main,
        body_parts: &[BodyPart::Legs],
        prescription: Some("12 下"),
        emoji: "🍑",
    },
    Exercise {
        id: "l8",
        name: "哥薩克深蹲",
        category: Category::Main,
        body_parts: &[BodyPart::Legs],
        prescription: Some("單邊 8 下"),
        emoji: "↔️",
    },
    Exercise {
        id: "l9",
        name: "啞鈴相撲深蹲",
        category: Category::Main,
        body_parts: &[BodyPart::Legs],
        prescription: Some("12 下"),
        emoji: "👺",
    },
    Exercise {
        id: "l10",
        name: "槓片弓步蹲",
        category: Category::Main,
        body_parts: &[BodyPart::Legs],
        prescription: Some("單腳 10 下"),
        emoji: "💿",
    },

    // 胸部肌力 (Chest)
    Exercise {
        id: "c1",
        name: "平板臥推",
        category: Category::Main,
        body_parts: &[BodyPart::Chest],
        prescription: Some("8-10 下"),
        emoji: "🛌",
    },
    Exercise {
        id: "c2",
        name: "上斜啞鈴臥推",
        category: Category::Main,
        body_parts: &[BodyPart::Chest],
        prescription: Some("10 下"),
        emoji: "📐",
    },
    Exercise {
        id: "c3",
        name: "啞鈴飛鳥 (Flys)",
        category: Category::Main,
        body_parts: &[BodyPart::Chest],
        prescription: Some("12 下"),
        emoji: "🦅",
    },
    Exercise {
        id: "c4",
        name: "加重伏地挺身",
        category: Category::Main,
        body_parts: &[BodyPart::Chest],
        prescription: Some("力竭"),
        emoji: "🎒",
    },
    Exercise {
        id: "c5",
        name: "下斜伏地挺身",
        category: Category::Main,
        body_parts: &[BodyPart::Chest],
        prescription: Some("15 下"),
        emoji: "↘️",
    },
    Exercise {
        id: "c6",
        name: "啞鈴窄距臥推",
        category: Category::Main,
        body_parts: &[BodyPart::Chest, BodyPart::Shoulders],
        prescription: Some("12 下"),
        emoji: "📏",
    },

    // 背部肌力 (Back)
    Exercise {
        id: "b1",
        name: "單臂啞鈴划船",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("單手 10 下"),
        emoji: "🛶",
    },
    Exercise {
        id: "b2",
        name: "槓鈴俯身划船",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("10 下"),
        emoji: "🏋️‍♀️",
    },
    Exercise {
        id: "b3",
        name: "上斜支撐划船",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("12 下"),
        emoji: "📐",
    },
    Exercise {
        id: "b4",
        name: "仰臥拉舉 (Pullover)",
        category: Category::Main,
        body_parts: &[BodyPart::Back, BodyPart::Chest],
        prescription: Some("12 下"),
        emoji: "🙆",
    },
    Exercise {
        id: "b5",
        name: "啞鈴聳肩",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("15 下"),
        emoji: "🤷",
    },
    Exercise {
        id: "b6",
        name: "直臂下壓 (仰臥)",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("15 下"),
        emoji: "👇",
    },
    Exercise {
        id: "b7",
        name: "潘德雷划船 (Pendlay)",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("8 下"),
        emoji: "🦍",
    },
    Exercise {
        id: "b8",
        name: "反手槓鈴划船 (Yates)",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("10 下"),
        emoji: "🖐️",
    },
    Exercise {
        id: "b9",
        name: "克羅克划船 (Kroc Row)",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("單手 20 下"),
        emoji: "🐊",
    },
    Exercise {
        id: "b10",
        name: "槓鈴早安式",
        category: Category::Main,
        body_parts: &[BodyPart::Back, BodyPart::Legs],
        prescription: Some("12 下"),
        emoji: "☀️",
    },
    Exercise {
        id: "b11",
        name: "寬握槓鈴划船",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("10 下"),
        emoji: "👐",
    },
    Exercise {
        id: "b12",
        name: "反向划船 (Inverted Row)",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("力竭"),
        emoji: "🙃",
    },
    Exercise {
        id: "b13",
        name: "俯臥挺身 (Superman)",
        category: Category::Main,
        body_parts: &[BodyPart::Back],
        prescription: Some("20 下"),
        emoji: "🦸",
    },
    Exercise {
        id: "b14",
        name: "鳥狗式 (Bird Dog)",
        category: Category::Main,
        body_parts: &[BodyPart::Back, BodyPart::Core],
        prescription: Some("單邊 12 下"),
        emoji: "🐕",
    },

    // 肩膀與三頭 (Shoulders)
    Exercise {
        id: "s1",
        name: "站姿槓鈴/啞鈴 肩推",
        category: Category::Main,
        body_parts: &[BodyPart::Shoulders],
        prescription: Some("8 下"),
        emoji: "💂",
    },
    Exercise {
        id: "s2",
        name: "坐姿啞鈴肩推",
        category: Category::Main,
        body_parts: &[BodyPart::Shoulders],
        prescription: Some("10 下"),
        emoji: "🪑",
    },
    Exercise {
        id: "s3",
        name: "啞鈴側平舉",
        category: Category::Main,
        body_parts: &[BodyPart::Shoulders],
        prescription: Some("15 下"),
        emoji: "🦅",
    },
    Exercise {
        id: "s4",
        name: "俯身飛鳥 (後三角)",
        category: Category::Main,
        body_parts: &[BodyPart::Shoulders],
        prescription: Some("15 下"),
        emoji: "🐦",
    },
    Exercise {
        id: "s5",
        name: "法式推舉 (三頭)",
        category: Category::Main,
        body_parts: &[BodyPart::Shoulders],
        prescription: Some("12 下"),
        emoji: "🇫🇷",
    },
    Exercise {
        id: "s6",
        name: "坐姿過頂三頭伸展",
        category: Category::Main,
        body_parts: &[BodyPart::Shoulders],
        prescription: Some("12 下"),
        emoji: "🙆‍♂️",
    },
    Exercise {
        id: "s7",
        name: "阿諾推舉",
        category: Category::Main,
        body_parts: &[BodyPart::Shoulders],
        prescription: Some("10 下"),
        emoji: "🤖",
    },
    Exercise {
        id: "s8",
        name: "啞鈴前平舉",
        category: Category::Main,
        body_parts: &[BodyPart::Shoulders],
        prescription: Some("12 下"),
        emoji: "🧟",
    },
    Exercise {
        id: "s9",
        name: "板凳臂屈伸 (Bench Dips)",
        category: Category::Main,
        body_parts: &[BodyPart::Shoulders, BodyPart::Chest],
        prescription: Some("15 下"),
        emoji: "🛋️",
    },
    Exercise {
        id: "s10",
        name: "槓片臉拉",
        category: Category::Main,
        body_parts: &[BodyPart::Shoulders, BodyPart::Back],
        prescription: Some("20 下"),
        emoji: "🤡",
    },

    // 核心/藥球 (Core)
    Exercise {
        id: "cr1",
        name: "藥球俄羅斯轉體",
        category: Category::Main,
        body_parts: &[BodyPart::Core],
        prescription: Some("40 下"),
        emoji: "🇷🇺",
    },
    Exercise {
        id: "cr2",
        name: "藥球 V字捲腹",
        category: Category::Main,
        body_parts: &[BodyPart::Core],
        prescription: Some("15 下"),
        emoji: "✌️",
    },
    Exercise {
        id: "cr3",
        name: "槓鈴滾輪 (Rollout)",
        category: Category::Main,
        body_parts: &[BodyPart::Core],
        prescription: Some("10 下"),
        emoji: "🛞",
    },
    Exercise {
        id: "cr4",
        name: "死蟲式 (對抗藥球)",
        category: Category::Main,
        body_parts: &[BodyPart::Core],
        prescription: Some("單邊 10 下"),
        emoji: "🪲",
    },
    Exercise {
        id: "cr5",
        name: "側棒式",
        category: Category::Main,
        body_parts: &[BodyPart::Core],
        prescription: Some("45 秒"),
        emoji: "📐",
    },
    Exercise {
        id: "cr6",
        name: "躺椅反向捲腹",
        category: Category::Main,
        body_parts: &[BodyPart::Core],
        prescription: Some("15 下"),
        emoji: "🔄",
    },
    Exercise {
        id: "cr7",
        name: "藥球伐木 (Woodchoppers)",
        category: Category::Main,
        body_parts: &[BodyPart::Core],
        prescription: Some("單邊 12 下"),
        emoji: "🪓",
    },
    Exercise {
        id: "cr8",
        name: "仰臥雨刷",
        category: Category::Main,
        body_parts: &[BodyPart::Core],
        prescription: Some("12 下"),
        emoji: "🚗",
    },
    Exercise {
        id: "cr9",
        name: "啞鈴棒式划船",
        category: Category::Main,
        body_parts: &[BodyPart::Core, BodyPart::Back],
        prescription: Some("10 下"),
        emoji: "🚣",
    },
    Exercise {
        id: "cr10",
        name: "側平板啞鈴上提",
        category: Category::Main,
        body_parts: &[BodyPart::Core],
        prescription: Some("單邊 12 下"),
        emoji: "🆙",
    },
    Exercise {
        id: "cr11",
        name: "弓箭步+槓片迴轉",
        category: Category::Main,
        body_parts: &[BodyPart::Core, BodyPart::Legs],
        prescription: Some("單邊 10 下"),
        emoji: "🥋",
    },
    Exercise {
        id: "cr12",
        name: "後跨步扭轉",
        category: Category::Main,
        body_parts: &[BodyPart::Core, BodyPart::Legs],
        prescription: Some("單邊 10 下"),
        emoji: "🕺",
    },
    Exercise {
        id: "cr13",
        name: "嬰兒式",
        category: Category::Main,
        body_parts: &[BodyPart::Core],
        prescription: Some("1 分鐘"),
        emoji: "👶",
    },

    // 剛性/動力鍊 (Functional)
    Exercise {
        id: "f1",
        name: "藥球旋轉砸牆/地",
        category: Category::Main,
        body_parts: &[BodyPart::Functional, BodyPart::Core],
        prescription: Some("單邊 8 下"),
        emoji: "💥",
    },
    Exercise {
        id: "f2",
        name: "單臂啞鈴抓舉",
        category: Category::Main,
        body_parts: &[BodyPart::Functional, BodyPart::Shoulders],
        prescription: Some("單手 6 下"),
        emoji: "🏋️‍♂️",
    },
    Exercise {
        id: "f3",
        name: "連續踝關節跳 (Pogo)",
        category: Category::Main,
        body_parts: &[BodyPart::Functional, BodyPart::Legs],
        prescription: Some("20 下"),
        emoji: "🐰",
    },
    Exercise {
        id: "f4",
        name: "深跳 (Depth Drop)",
        category: Category::Main,
        body_parts: &[BodyPart::Functional, BodyPart::Legs],
        prescription: Some("6 下"),
        emoji: "📦",
    },
    Exercise {
        id: "f5",
        name: "藥球過頂前砸",
        category: Category::Main,
        body_parts: &[BodyPart::Functional, BodyPart::Core],
        prescription: Some("10 下"),
        emoji: "☄️",
    },
    Exercise {
        id: "f6",
        name: "單腳連續跳 (Hops)",
        category: Category::Main,
        body_parts: &[BodyPart::Functional, BodyPart::Legs],
        prescription: Some("單腳 10 下"),
        emoji: "🦶",
    },
    Exercise {
        id: "f7",
        name: "啞鈴高翻 (Clean)",
        category: Category::Main,
        body_parts: &[BodyPart::Functional],
        prescription: Some("8 下"),
        emoji: "⚡",
    },
    Exercise {
        id: "f8",
        name: "單腳落地穩定",
        category: Category::Main,
        body_parts: &[BodyPart::Functional, BodyPart::Legs],
        prescription: Some("單腳 5 下"),
        emoji: "🧘",
    },
    Exercise {
        id: "f9",
        name: "180度深蹲跳",
        category: Category::Main,
        body_parts: &[BodyPart::Functional, BodyPart::Legs],
        prescription: Some("8 下"),
        emoji: "🔄",
    },
    Exercise {
        id: "f10",
        name: "藥球橫向爆發拋",
        category: Category::Main,
        body_parts: &[BodyPart::Functional, BodyPart::Core],
        prescription: Some("單邊 8 下"),
        emoji: "🏐",
    },

    // 收操 (Cooldown)
    Exercise {
        id: "cd1",
        name: "腿後側伸展",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Legs],
        prescription: None,
        emoji: "🦵",
    },
    Exercise {
        id: "cd2",
        name: "嬰兒式",
        category: Category::Cooldown,
        body_parts: &[BodyPart::General],
        prescription: None,
        emoji: "👶",
    },
    Exercise {
        id: "cd3",
        name: "胸大肌伸展",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Chest],
        prescription: None,
        emoji: "🚪",
    },
    Exercise {
        id: "cd4",
        name: "臀部伸展 (鴿式)",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Legs],
        prescription: None,
        emoji: "🐦",
    },
    Exercise {
        id: "cd5",
        name: "上斜方肌伸展",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Shoulders, BodyPart::Back],
        prescription: None,
        emoji: "💆",
    },
    Exercise {
        id: "cd6",
        name: "眼鏡蛇式",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Core, BodyPart::General],
        prescription: None,
        emoji: "🐍",
    },
    Exercise {
        id: "cd7",
        name: "站姿股四頭肌伸展",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Legs],
        prescription: None,
        emoji: "🩰",
    },
    Exercise {
        id: "cd8",
        name: "坐姿腿後側伸展",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Legs],
        prescription: None,
        emoji: "🧘",
    },
    Exercise {
        id: "cd9",
        name: "蝴蝶式",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Legs],
        prescription: None,
        emoji: "🦋",
    },
    Exercise {
        id: "cd10",
        name: "門框胸大肌伸展",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Chest],
        prescription: None,
        emoji: "🚪",
    },
    Exercise {
        id: "cd11",
        name: "背後扣手伸展",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Shoulders],
        prescription: None,
        emoji: "🤝",
    },
    Exercise {
        id: "cd12",
        name: "貓牛式",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Back, BodyPart::Core],
        prescription: None,
        emoji: "🐄",
    },
    Exercise {
        id: "cd13",
        name: "跪姿背闊肌伸展",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Back],
        prescription: None,
        emoji: "🙇",
    },
    Exercise {
        id: "cd14",
        name: "十字肩部伸展",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Shoulders],
        prescription: None,
        emoji: "✝️",
    },
    Exercise {
        id: "cd15",
        name: "過頂三頭肌伸展",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Shoulders],
        prescription: None,
        emoji: "💪",
    },
    Exercise {
        id: "cd16",
        name: "弓箭步脊椎扭轉",
        category: Category::Cooldown,
        body_parts: &[BodyPart::Core, BodyPart::General],
        prescription: None,
        emoji: "🌪️",
    },
];

pub fn find_exercise(id: &str) -> Option<&'static Exercise> {
    EXERCISE_DB.iter().find(|e| e.id == id)
}

pub fn exercises_in(catalog: &[Exercise], category: Category) -> Vec<Exercise> {
    catalog.iter().filter(|e| e.category == category).copied().collect()
}
