//! Localized bot copy.
//!
//! One static table per `Language`. Amounts are appended by the caller,
//! the `*_prefix` strings end right before the `$` value.

use super::subscription::Language;

/// Message strings for one language.
#[derive(Debug)]
pub struct Texts {
    pub welcome: &'static str,
    pub language_selected: &'static str,
    pub main_menu: &'static str,
    pub create_alert: &'static str,
    pub view_alert: &'static str,
    pub delete_alert: &'static str,
    pub enter_amount: &'static str,
    pub alert_created: &'static str,
    pub no_alert: &'static str,
    pub current_alert_prefix: &'static str,
    pub alert_deleted: &'static str,
    pub deposit_available_prefix: &'static str,
    pub invalid_amount: &'static str,
    pub back_to_menu: &'static str,
}

static RUSSIAN: Texts = Texts {
    welcome: "Добро пожаловать gigavault_monitor_bot! Этот бот мониторит свободное место \
              для депозита в Gigavault Vault на бирже Paradex. Выберите язык:",
    language_selected: "Вы выбрали русский язык.",
    main_menu: "Главное меню. Выберите действие:",
    create_alert: "Создать уведомление",
    view_alert: "Посмотреть уведомление",
    delete_alert: "Удалить уведомление",
    enter_amount: "Введите сумму в $ для уведомления:",
    alert_created: "Уведомление создано. Вы получите сообщение, когда сумма доступного \
                    депозита превысит указанную вами.",
    no_alert: "У вас нет активных уведомлений.",
    current_alert_prefix: "Ваше текущее уведомление установлено на сумму: $",
    alert_deleted: "Уведомление удалено.",
    deposit_available_prefix: "Доступен депозит в размере до $",
    invalid_amount: "Пожалуйста, введите корректное число.",
    back_to_menu: "Вернуться в меню",
};

static ENGLISH: Texts = Texts {
    welcome: "Welcome to gigavault_monitor_bot! This bot monitors available deposit space \
              in the Gigavault Vault on the Paradex. Please select a language:",
    language_selected: "You have selected English.",
    main_menu: "Main menu. Choose an action:",
    create_alert: "Create alert",
    view_alert: "View alert",
    delete_alert: "Delete alert",
    enter_amount: "Enter amount in $ for the alert:",
    alert_created: "Alert created. You will receive a notification when the available \
                    deposit amount exceeds your specified value.",
    no_alert: "You have no active alerts.",
    current_alert_prefix: "Your current alert is set to: $",
    alert_deleted: "Alert deleted.",
    deposit_available_prefix: "Deposit available up to $",
    invalid_amount: "Please enter a valid number.",
    back_to_menu: "Back to menu",
};

impl Texts {
    /// Table for `language`.
    pub fn for_language(language: Language) -> &'static Self {
        match language {
            Language::Russian => &RUSSIAN,
            Language::English => &ENGLISH,
        }
    }

    /// Button label shown for a language choice (always in that language).
    pub fn language_name(language: Language) -> &'static str {
        match language {
            Language::Russian => "Русский",
            Language::English => "English",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_differ_per_language() {
        let ru = Texts::for_language(Language::Russian);
        let en = Texts::for_language(Language::English);
        assert_ne!(ru.deposit_available_prefix, en.deposit_available_prefix);
        assert!(en.deposit_available_prefix.ends_with('$'));
        assert!(ru.deposit_available_prefix.ends_with('$'));
    }
}
