/// Localized response and comment messages
///
/// Every message has a stable dotted key. Catalogs exist for English, German
/// and French; missing locales fall back to English.
use crate::constants::DEFAULT_LOCALE;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageKey {
    Processed,
    UnknownType,
    InvalidJson,
    MissingType,
    InvalidPayload,
    InvalidNotificationMessage,
    SubscriptionFailed,
    TopicNotAllowed,
    InternalError,
    ComplaintAbuse,
    ComplaintFraud,
    ComplaintVirus,
    ComplaintUnknown,
}

impl MessageKey {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Processed => "webhook.callback.processed",
            Self::UnknownType => "webhook.callback.unknown_type",
            Self::InvalidJson => "webhook.error.invalid_json",
            Self::MissingType => "webhook.error.missing_type",
            Self::InvalidPayload => "webhook.error.invalid_payload",
            Self::InvalidNotificationMessage => "webhook.error.invalid_notification_message",
            Self::SubscriptionFailed => "webhook.error.subscription_failed",
            Self::TopicNotAllowed => "webhook.error.topic_not_allowed",
            Self::InternalError => "webhook.error.internal",
            Self::ComplaintAbuse => "dnc.complaint.reason.abuse",
            Self::ComplaintFraud => "dnc.complaint.reason.fraud",
            Self::ComplaintVirus => "dnc.complaint.reason.virus",
            Self::ComplaintUnknown => "dnc.complaint.reason.unknown",
        }
    }

    /// Maps an SES `complaintFeedbackType` to the comment recorded on the entry
    pub fn for_complaint_feedback(feedback_type: Option<&str>) -> Self {
        match feedback_type {
            Some("abuse") => Self::ComplaintAbuse,
            Some("fraud") => Self::ComplaintFraud,
            Some("virus") => Self::ComplaintVirus,
            _ => Self::ComplaintUnknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    En,
    De,
    Fr,
}

impl Locale {
    /// Accepts `de`, `de_DE`, `de-AT`, ... and falls back to English
    pub fn parse(tag: &str) -> Self {
        let language = tag
            .split(['_', '-'])
            .next()
            .unwrap_or(DEFAULT_LOCALE)
            .to_ascii_lowercase();

        match language.as_str() {
            "de" => Self::De,
            "fr" => Self::Fr,
            _ => Self::En,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Translator {
    locale: Locale,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl Translator {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: Locale::parse(locale),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn translate(&self, key: MessageKey) -> String {
        let text = match self.locale {
            Locale::En => None,
            Locale::De => german(key),
            Locale::Fr => french(key),
        };
        text.unwrap_or_else(|| english(key)).to_string()
    }

    /// Translates and substitutes `%name%` placeholders
    pub fn translate_with(&self, key: MessageKey, params: &[(&str, &str)]) -> String {
        params
            .iter()
            .fold(self.translate(key), |text, (name, value)| {
                text.replace(&format!("%{}%", name), value)
            })
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Processed => "Callback processed",
        MessageKey::UnknownType => "Unknown notification type: %type%",
        MessageKey::InvalidJson => "Invalid JSON payload",
        MessageKey::MissingType => "The payload does not contain a notification type",
        MessageKey::InvalidPayload => "The notification payload is invalid",
        MessageKey::InvalidNotificationMessage => "The notification message could not be decoded",
        MessageKey::SubscriptionFailed => "The subscription could not be confirmed",
        MessageKey::TopicNotAllowed => "Notifications from this topic are not accepted",
        MessageKey::InternalError => "The callback could not be processed",
        MessageKey::ComplaintAbuse => "The recipient reported the email as abuse",
        MessageKey::ComplaintFraud => "The recipient reported the email as fraud",
        MessageKey::ComplaintVirus => "The recipient reported the email as containing a virus",
        MessageKey::ComplaintUnknown => "The recipient complained about the email",
    }
}

fn german(key: MessageKey) -> Option<&'static str> {
    let text = match key {
        MessageKey::Processed => "Callback verarbeitet",
        MessageKey::UnknownType => "Unbekannter Benachrichtigungstyp: %type%",
        MessageKey::InvalidJson => "Ungültige JSON-Nutzlast",
        MessageKey::MissingType => "Die Nutzlast enthält keinen Benachrichtigungstyp",
        MessageKey::InvalidPayload => "Die Benachrichtigung ist ungültig",
        MessageKey::SubscriptionFailed => "Das Abonnement konnte nicht bestätigt werden",
        MessageKey::ComplaintAbuse => "Der Empfänger hat die E-Mail als Missbrauch gemeldet",
        MessageKey::ComplaintFraud => "Der Empfänger hat die E-Mail als Betrug gemeldet",
        MessageKey::ComplaintUnknown => "Der Empfänger hat sich über die E-Mail beschwert",
        _ => return None,
    };
    Some(text)
}

fn french(key: MessageKey) -> Option<&'static str> {
    let text = match key {
        MessageKey::Processed => "Callback traité",
        MessageKey::UnknownType => "Type de notification inconnu : %type%",
        MessageKey::InvalidJson => "Contenu JSON invalide",
        MessageKey::MissingType => "Le contenu ne précise pas de type de notification",
        MessageKey::InvalidPayload => "La notification est invalide",
        MessageKey::SubscriptionFailed => "L'abonnement n'a pas pu être confirmé",
        MessageKey::ComplaintAbuse => "Le destinataire a signalé l'email comme abusif",
        MessageKey::ComplaintFraud => "Le destinataire a signalé l'email comme frauduleux",
        MessageKey::ComplaintUnknown => "Le destinataire s'est plaint de l'email",
        _ => return None,
    };
    Some(text)
}
