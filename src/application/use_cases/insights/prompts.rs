use serde_json::{json, Value};

use crate::domain::insights::AiInsights;
use crate::domain::reflection::ReflectionData;

pub(crate) const TRANSCRIPTION_INSTRUCTION: &str =
    "Tiksliai perrašyk šį garso įrašą į tekstą lietuvių kalba. Pateik tik patį perrašytą tekstą.";

const NOT_PROVIDED: &str = "Nenurodyta";

pub(crate) fn insights_prompt(summaries_json: &str, feedback: &[String]) -> String {
    format!(
        r#"Esi pedagoginis mentorius ir duomenų analitikas. Tau pateikiama mokslo metų pabaigos apklausos santrauka, kurią pildė MOKINIAI (kartais padedami tėvų).
Tavo užduotis - analizuoti duomenis iš mokinio perspektyvos: kaip jie jaučiasi pamokose, ar jiems suprantamas turinys, koks jų santykis su mokytoju.

KIEKYBINIAI DUOMENYS (Mokinių vertinimai 1-5 skalėje):
{summaries}

KOKYBINIAI DUOMENYS (Mokinių tekstiniai atsakymai, jų mintys ir jausmai):
{feedback}

Remiantis šiais duomenimis, sugeneruok išsamią analizę JSON formatu lietuvių kalba:
1. "strengths": Mokinių labiausiai vertinamos mokytojo savybės ar metodai.
2. "improvements": Sritys, kurias mokiniai (vaikai) indikavo kaip sunkias, neaiškias ar nemalonias.
3. "insights": Gilios pedagoginės įžvalgos apie tai, kaip mokiniai priima mokymosi procesą.
4. "themes": Išskirk 3-4 pagrindines temas iš tekstinių atsakymų (pvz., "Emocinis saugumas", "Namų darbų krūvis"). Kiekvienai temai pateik aprašymą ir vyraujančią mokinių nuotaiką.
5. "sentimentScore": Bendras mokslo metų emocinis fonas mokinio akimis (nuo 0 iki 100)."#,
        summaries = summaries_json,
        feedback = feedback.join("\n"),
    )
}

pub(crate) fn insights_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "strengths": { "type": "STRING" },
            "improvements": { "type": "STRING" },
            "insights": { "type": "STRING" },
            "sentimentScore": { "type": "NUMBER" },
            "themes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "label": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "sentiment": { "type": "STRING" }
                    },
                    "required": ["label", "description", "sentiment"]
                }
            }
        },
        "required": ["strengths", "improvements", "insights", "themes", "sentimentScore"]
    })
}

pub(crate) fn suggestions_prompt(
    reflection: &ReflectionData,
    insights: Option<&AiInsights>,
    themes_json: &str,
) -> String {
    let or_default = |value: Option<&str>| -> String {
        value
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(NOT_PROVIDED)
            .to_string()
    };
    let strengths = or_default(insights.map(|i| i.strengths.as_str()));
    let improvements = or_default(insights.map(|i| i.improvements.as_str()));
    let sentiment = insights
        .map(AiInsights::effective_sentiment)
        .unwrap_or(crate::domain::insights::NEUTRAL_SENTIMENT);

    format!(
        r#"Esi pedagoginis mentorius. Mokytojas atlieka mokslo metų savirefleksiją.
Tavo užduotis: padėti mokytojui suformuluoti gilias įžvalgas, kurios tiesiogiai atlieptų MOKINIŲ lūkesčius ir jausmus.

STUDENTŲ APŽVALGOS DUOMENYS (DI Analizė):
- Mokinių matomos stiprybės: {strengths}
- Mokinių nurodyti sunkumai: {improvements}
- Pagrindinės temos: {themes}
- Emocinis balas: {sentiment}/100

DABARTINIAI MOKYTOJO PASTEBĖJIMAI:
- Pastebėjimai: {observations}
- Mokytojo įžvelgtos stiprybės: {own_strengths}
- Mokytojo įžvelgtos tobulintinos sritys: {own_improvements}
- Netikėtumai: {surprises}

Sugeneruok trumpus (1-2 sakiniai), konkrečius pasiūlymus, kurie padėtų mokytojui dar geriau suprasti mokinius:
1. "observationSuggestions": Pasiūlymai, kaip mokytojas galėtų giliau interpretuoti mokinių duomenis (atsižvelgiant į temas).
2. "analysisSuggestions": Įžvalgos apie tai, kaip mokytojo veiksmai koreliuoja su mokinių nurodytais sunkumais.
3. "bestPracticeSuggestions": Ką tęsti, kad išlaikyti teigiamą mokinių sentimentą.
4. "emotionSuggestions": Padėk mokytojui įvardinti jausmą (profesinę empatiją), atitinkantį mokinių grįžtamąjį ryšį.
5. "actionSuggestions": Konkretūs pokyčiai (start/stop/continue), kurie tiesiogiai spręstų mokinių įvardintas problemas.
6. "nextStepSuggestions": Kaip pamatuoti pokytį mokinio akimis.

Atsakymą pateik JSON formatu lietuvių kalba. Būk empatiškas, bet objektyvus."#,
        strengths = strengths,
        improvements = improvements,
        themes = themes_json,
        sentiment = sentiment,
        observations = reflection.observations,
        own_strengths = reflection.strengths,
        own_improvements = reflection.improvements,
        surprises = reflection.surprises,
    )
}

pub(crate) fn suggestions_schema() -> Value {
    let string_list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    let fields = [
        "observationSuggestions",
        "analysisSuggestions",
        "bestPracticeSuggestions",
        "emotionSuggestions",
        "actionSuggestions",
        "nextStepSuggestions",
    ];

    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|name| (name.to_string(), string_list.clone()))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": fields,
    })
}
