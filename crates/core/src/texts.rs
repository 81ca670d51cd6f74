//! User-facing texts.

use crate::inbound::Command;

pub const FILTER_GENRE_PROMPT: &str = "Выберите жанр: ";
pub const FILTER_RATING_PROMPT: &str = "Теперь укажите минимальный желаемый рейтинг";
pub const FILTER_YEAR_PROMPT: &str =
    "Теперь введите желаемый диапазон лет через \"пробел\".\nПример: 2010 2020";
pub const FILTER_AMOUNT_PROMPT: &str = "Сколько фильмов показать?";

pub const NOTHING_FOUND: &str = "Ничего не нашлось. Попробуйте изменить запрос.";
pub const MORE_RESULTS: &str =
    "Нажмите \"Далее\", чтобы найти ещё фильмы по вашему запросу. Нажмите \"Хватит\", чтобы остановить поиск";
pub const NOTHING_MORE: &str = "По данному запросу больше ничего нет";
pub const SEARCH_STOPPED: &str = "Хорошо, можете попробовать другой запрос";

pub const HISTORY_PROMPT: &str = "Сколько последних запросов показать?";
pub const HISTORY_EMPTY: &str = "История поиска пока пуста";

pub const TRY_AGAIN: &str = "Не удалось получить данные о фильмах. Попробуйте ещё раз чуть позже.";
pub const INTERNAL_FAILURE: &str = "Что-то пошло не так. Начните поиск заново.";
pub const CANCELLED: &str = "Поиск прерван";
pub const NOTHING_TO_CANCEL: &str = "Сейчас нечего прерывать";
pub const USE_BUTTONS: &str = "Пожалуйста, выберите вариант с помощью кнопок выше";
pub const OUTDATED_BUTTON: &str = "Эта кнопка уже неактуальна";
pub const UNKNOWN_INPUT: &str = "Если вы не знаете с чего начать - используйте команду /help";

/// Word that triggers the greeting reply.
pub const GREETING_TRIGGER: &str = "Привет";

pub fn greeting(full_name: &str) -> String {
    format!(
        "Привет, {full_name}! Это бот для поиска информации о фильмах. Подробная информация - /help"
    )
}

pub fn greeting_reply(first_name: &str) -> String {
    format!("И тебе привет, {first_name}! Список моих команд можно посмотреть здесь - /help")
}

pub fn help() -> String {
    let mut lines = vec!["Я умею:".to_string()];
    lines.extend(
        Command::ALL
            .iter()
            .map(|cmd| format!("/{} - {}", cmd.name(), cmd.description())),
    );
    lines.join("\n")
}

pub fn filter_type_prompt(first_name: &str) -> String {
    format!("{first_name}, что хотите найти:")
}

pub fn type_chosen(label: &str) -> String {
    format!("Выбранный тип - {label}. Отличный выбор!")
}

pub fn genre_chosen(label: &str) -> String {
    format!("Выбранный жанр - {label}")
}

pub fn rating_min_chosen(min: u8) -> String {
    format!("Вы выбрали минимальный рейтинг - {min}. Теперь укажите максимальный: ")
}

pub fn rating_chosen(min: u8, max: u8) -> String {
    format!("Выбранный рейтинг: {min}-{max}")
}

pub fn name_query_prompt(first_name: &str) -> String {
    format!("{first_name}, введите название фильма для поиска:")
}

pub fn name_amount_prompt(first_name: &str) -> String {
    format!("{first_name}, сколько фильмов показать? (максимум 5) ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_every_command() {
        let text = help();
        for cmd in Command::ALL {
            assert!(text.contains(&format!("/{} - ", cmd.name())));
        }
    }

    #[test]
    fn prompts_address_the_user() {
        assert_eq!(filter_type_prompt("Анна"), "Анна, что хотите найти:");
        assert_eq!(rating_chosen(5, 8), "Выбранный рейтинг: 5-8");
    }
}
