//! Localized texts
//!
//! One table per supported language: menu labels, fixed replies and the
//! messages the router emits (placeholder, apology). Adding a language means
//! adding a `Locale` value, not touching dispatch logic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported conversation languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Kk,
    Ru,
    En,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Kk, Language::Ru, Language::En];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Kk => "kk",
            Language::Ru => "ru",
            Language::En => "en",
        }
    }

    /// Caption of the language-picker button (same in every locale)
    pub fn button_label(&self) -> &'static str {
        match self {
            Language::Kk => "🇰🇿 Қазақша",
            Language::Ru => "🇷🇺 Русский",
            Language::En => "🇬🇧 English",
        }
    }

    /// Find the language whose picker button has exactly this caption
    pub fn from_button_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.button_label() == label)
    }

    pub fn locale(&self) -> &'static Locale {
        match self {
            Language::Kk => &KK,
            Language::Ru => &RU,
            Language::En => &EN,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported language code: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kk" => Ok(Language::Kk),
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Button captions of the main menu
#[derive(Debug)]
pub struct MenuLabels {
    pub programs: &'static str,
    pub admission: &'static str,
    pub tuition: &'static str,
    pub contacts: &'static str,
    pub change_language: &'static str,
    pub reset: &'static str,
}

/// Canned replies for the informational menu buttons
#[derive(Debug)]
pub struct FixedReplies {
    pub programs: &'static str,
    pub admission: &'static str,
    pub tuition: &'static str,
    pub contacts: &'static str,
}

/// Everything language-specific the bot says
#[derive(Debug)]
pub struct Locale {
    pub language: Language,
    /// Language name as written into the model instruction
    pub prompt_language: &'static str,
    pub greeting: &'static str,
    pub help: &'static str,
    pub thinking: &'static str,
    pub error: &'static str,
    /// Phrase the model must use when the corpus has no answer
    pub refusal: &'static str,
    pub reset_done: &'static str,
    pub language_prompt: &'static str,
    pub language_changed: &'static str,
    pub menu: MenuLabels,
    pub replies: FixedReplies,
}

/// University name used in the model instruction
pub const UNIVERSITY_NAME: &str = "Халел Досмұхамедов атындағы Атырау университеті";

static KK: Locale = Locale {
    language: Language::Kk,
    prompt_language: "Kazakh (қазақ тілі)",
    greeting: "Сәлем! Мен Халел Досмұхамедов атындағы Атырау университеті туралы сұрақтарыңызға жауап беруге дайынмын.\n\nТөмендегі мәзірді пайдаланыңыз немесе сұрағыңызды жазыңыз.",
    help: "Маған кез келген сұрақты қойыңыз, мысалы: 'Грантқа түсу үшін не істеу керек?' немесе 'Platonus-тан парольді қалай аламын?'.\n\n/start - басты мәзір\n/language - тілді таңдау\n/reset - диалогты қайта бастау",
    thinking: "Ойланудамын, сәл күте тұрыңыз... 🧠",
    error: "Кешіріңіз, қате пайда болды. Сәлден соң қайталап көріңіз.",
    refusal: "Кешіріңіз, бұл сұрақ бойынша менде нақты ақпарат жоқ",
    reset_done: "Диалог қайта басталды 🔄",
    language_prompt: "Тілді таңдаңыз:",
    language_changed: "Тіл өзгертілді: қазақ тілі 🇰🇿",
    menu: MenuLabels {
        programs: "🎓 Білім беру бағдарламалары",
        admission: "📅 Қабылдау мерзімдері",
        tuition: "💰 Оқу ақысы",
        contacts: "📞 Байланыс",
        change_language: "🌐 Тілді өзгерту",
        reset: "🔄 Қайта бастау",
    },
    replies: FixedReplies {
        programs: "🎓 Университетте бакалавриат, магистратура және докторантура бағдарламалары бойынша оқытылады: педагогика, филология, жаратылыстану, экономика, құқық, ақпараттық технологиялар және инженерия бағыттары.\n\nТолық тізімді қабылдау комиссиясынан біле аласыз.",
        admission: "📅 Бакалавриатқа құжаттар қабылдау 20 маусымнан 25 тамызға дейін жүргізіледі.\n\nМагистратура мен докторантураға қабылдау мерзімдерін қабылдау комиссиясынан нақтылаңыз.",
        tuition: "💰 Оқу ақысы таңдалған білім беру бағдарламасына байланысты. Мемлекеттік білім беру грантының иегерлері тегін оқиды.\n\nНақты соманы қабылдау комиссиясынан біліңіз.",
        contacts: "📞 Мекенжай: Атырау қ., Студенттер даңғылы, 1.\n\nСұрақтарыңыз болса, қабылдау комиссиясына жүгініңіз.",
    },
};

static RU: Locale = Locale {
    language: Language::Ru,
    prompt_language: "Russian (русский язык)",
    greeting: "Здравствуйте! Я отвечаю на вопросы об Атырауском университете имени Халела Досмухамедова.\n\nВоспользуйтесь меню ниже или напишите свой вопрос.",
    help: "Задайте мне любой вопрос, например: 'Как поступить на грант?' или 'Как получить пароль от Platonus?'.\n\n/start - главное меню\n/language - выбор языка\n/reset - начать диалог заново",
    thinking: "Думаю, подождите немного... 🧠",
    error: "Извините, произошла ошибка. Попробуйте ещё раз чуть позже.",
    refusal: "Извините, по этому вопросу у меня нет точной информации",
    reset_done: "Диалог начат заново 🔄",
    language_prompt: "Выберите язык:",
    language_changed: "Язык изменён: русский 🇷🇺",
    menu: MenuLabels {
        programs: "🎓 Образовательные программы",
        admission: "📅 Сроки приёма",
        tuition: "💰 Стоимость обучения",
        contacts: "📞 Контакты",
        change_language: "🌐 Сменить язык",
        reset: "🔄 Начать заново",
    },
    replies: FixedReplies {
        programs: "🎓 В университете ведётся обучение по программам бакалавриата, магистратуры и докторантуры: педагогика, филология, естественные науки, экономика, право, информационные технологии и инженерия.\n\nПолный перечень можно узнать в приёмной комиссии.",
        admission: "📅 Приём документов в бакалавриат проводится с 20 июня по 25 августа.\n\nСроки приёма в магистратуру и докторантуру уточняйте в приёмной комиссии.",
        tuition: "💰 Стоимость обучения зависит от выбранной образовательной программы. Обладатели государственного образовательного гранта обучаются бесплатно.\n\nТочную сумму уточняйте в приёмной комиссии.",
        contacts: "📞 Адрес: г. Атырау, проспект Студенческий, 1.\n\nПо всем вопросам обращайтесь в приёмную комиссию.",
    },
};

static EN: Locale = Locale {
    language: Language::En,
    prompt_language: "English",
    greeting: "Hello! I answer questions about Kh. Dosmukhamedov Atyrau University.\n\nUse the menu below or type your question.",
    help: "Ask me anything, for example: 'How do I apply for a state grant?' or 'How do I get my Platonus password?'.\n\n/start - main menu\n/language - choose language\n/reset - restart the dialog",
    thinking: "Thinking, please wait a moment... 🧠",
    error: "Sorry, something went wrong. Please try again a little later.",
    refusal: "Sorry, I don't have specific information on this question",
    reset_done: "The dialog has been restarted 🔄",
    language_prompt: "Choose a language:",
    language_changed: "Language changed: English 🇬🇧",
    menu: MenuLabels {
        programs: "🎓 Study programs",
        admission: "📅 Admission dates",
        tuition: "💰 Tuition fees",
        contacts: "📞 Contacts",
        change_language: "🌐 Change language",
        reset: "🔄 Reset dialog",
    },
    replies: FixedReplies {
        programs: "🎓 The university teaches bachelor, master and doctoral programs in education, philology, natural sciences, economics, law, information technology and engineering.\n\nThe admissions office has the full list.",
        admission: "📅 Bachelor applications are accepted from June 20 to August 25.\n\nPlease check master and doctoral admission dates with the admissions office.",
        tuition: "💰 Tuition depends on the chosen study program. State grant holders study free of charge.\n\nPlease ask the admissions office for the exact amount.",
        contacts: "📞 Address: 1 Studenchesky Avenue, Atyrau.\n\nFor any questions please contact the admissions office.",
    },
};
