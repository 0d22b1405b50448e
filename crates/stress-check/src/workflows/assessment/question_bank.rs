use super::domain::{AnswerOption, Question, QuestionGroup};

/// Frequency scale where more frequent answers indicate more stress.
pub const ASCENDING_SCALE: [AnswerOption; 5] = [
    AnswerOption { label: "কখনই না", points: 1 },
    AnswerOption { label: "অনেকাংশে না", points: 2 },
    AnswerOption { label: "মাঝে মাঝে", points: 3 },
    AnswerOption { label: "প্রায়শই", points: 4 },
    AnswerOption { label: "ঘন ঘন", points: 5 },
];

/// Frequency scale where more frequent answers indicate less stress.
pub const DESCENDING_SCALE: [AnswerOption; 5] = [
    AnswerOption { label: "ঘন ঘন", points: 1 },
    AnswerOption { label: "প্রায়শই", points: 2 },
    AnswerOption { label: "মাঝে মাঝে", points: 3 },
    AnswerOption { label: "অনেকাংশে না", points: 4 },
    AnswerOption { label: "কখনই না", points: 5 },
];

const fn distress(prompt: &'static str) -> Question {
    Question {
        prompt,
        options: &ASCENDING_SCALE,
        group: QuestionGroup::Distress,
    }
}

const fn coping(prompt: &'static str) -> Question {
    Question {
        prompt,
        options: &DESCENDING_SCALE,
        group: QuestionGroup::Coping,
    }
}

static STANDARD_QUESTIONS: [Question; 10] = [
    distress("গত এক মাসে অনাকাঙ্ক্ষিত কোন ঘটনার জন্য আপনি কতটুকু বিপর্যস্ত ছিলেন?"),
    distress("গত এক মাসে আপনি কতটুকু অনুভব করতে পেরেছিলেন যে আপনার জীবনের গুরুত্বপূর্ণ ঘটনাগুলো আপনি নিয়ন্ত্রন করতে পারছেন না?"),
    distress("গত এক মাসে আপনি কতটুকু ঘাবড়ে যাওয়া এবং চাপ অনুভব করেছিলেন?"),
    distress("গত এক মাসে আপনি কতটুকু অনুভব করেছিলেন যে আপনার যা করনীয় তা আপনি করতে পারেন নি?"),
    distress("গত এক মাসে নিয়ন্ত্রণের বাহিরে যাওয়া কোন ঘটনার জন্য আপনি কতটুকু ক্রোধান্বিত হয়েছিলেন?"),
    distress("গত এক মাসে আপনি কতটুকু অনুভব করেছিলেন যে জীবনের জটিলতাগুলো এতই বড় যে আপনি অতিক্রম করতে পারবেন না?"),
    coping("গত এক মাসে আপনার ব্যাক্তিগত সমস্যাগুলো নিয়ন্ত্রণের ক্ষেত্রে আপনি কতটুকু আত্নবিশ্বাসী ছিলেন?"),
    coping("গত এক মাসে আপনি কতটুকু অনুভব করেছিলেন যে চলমান ঘটনাগুলো আপনার অনুকূলে যাচ্ছে?"),
    coping("গত এক মাসে আপনি আপনার জীবনের বিরক্তি / তিক্ততা কতটুকু নিয়ন্ত্রণ করতে পেরেছিলেন?"),
    coping("গত এক মাসে আপনি কতটুকু অনুভব করেছিলেন যে আপনি সবকিছুর ঊর্ধ্বে? (আপনার প্রাধান্য বেশি)"),
];

const FIRST_GROUP_BANNER: &str = "এই প্রশ্নপত্রে ৬টি প্রশ্ন আছে। প্রশ্নে উল্লিখিত অনুভূতিগুলি গত ১ মাসে আপনার মধ্যে কি পরিমাণ ঘটেছে তা নিচের অপশনে ক্লিক করে নির্দেশ করুন।";
const SECOND_GROUP_BANNER: &str = "এই প্রশ্নপত্রে ৪টি প্রশ্ন আছে। প্রশ্নে উল্লিখিত অনুভূতি এবং ভাবনাগুলি গত ১ মাসে আপনার মধ্যে কি পরিমাণ ঘটেছে তা নিচের অপশনে ক্লিক করে নির্দেশ করুন।";

/// Ordered, read-only questionnaire.
#[derive(Debug, Clone, Copy)]
pub struct QuestionBank {
    questions: &'static [Question],
}

impl QuestionBank {
    pub fn standard() -> Self {
        Self {
            questions: &STANDARD_QUESTIONS,
        }
    }

    /// Callers validate `index` against [`QuestionBank::count`].
    pub fn get(&self, index: usize) -> &'static Question {
        &self.questions[index]
    }

    pub fn count(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &'static [Question] {
        self.questions
    }

    /// Instruction shown when the respondent reaches `index`, if any.
    pub fn banner(&self, index: usize) -> Option<&'static str> {
        match index {
            0 => Some(FIRST_GROUP_BANNER),
            6 => Some(SECOND_GROUP_BANNER),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bank_has_six_distress_then_four_coping_items() {
        let bank = QuestionBank::standard();
        assert_eq!(bank.count(), 10);
        let groups: Vec<QuestionGroup> = bank.questions().iter().map(|q| q.group).collect();
        assert!(groups[..6].iter().all(|g| *g == QuestionGroup::Distress));
        assert!(groups[6..].iter().all(|g| *g == QuestionGroup::Coping));
    }

    #[test]
    fn every_question_scores_a_permutation_of_one_to_five() {
        for question in QuestionBank::standard().questions() {
            let mut points: Vec<u8> = question.options.iter().map(|o| o.points).collect();
            points.sort_unstable();
            assert_eq!(points, vec![1, 2, 3, 4, 5], "{}", question.prompt);
        }
    }

    #[test]
    fn scales_mirror_each_other() {
        for option in ASCENDING_SCALE {
            let mirrored = DESCENDING_SCALE
                .iter()
                .find(|candidate| candidate.label == option.label)
                .expect("label present on both scales");
            assert_eq!(option.points + mirrored.points, 6);
        }
    }

    #[test]
    fn banners_only_open_each_group() {
        let bank = QuestionBank::standard();
        assert!(bank.banner(0).is_some_and(|b| b.contains("৬টি")));
        assert!(bank.banner(6).is_some_and(|b| b.contains("৪টি")));
        assert!((1..6).chain(7..10).all(|index| bank.banner(index).is_none()));
    }
}
